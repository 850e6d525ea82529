use ferry_codegen::{generate_unit, CodegenConfig};
use ferry_types::Inventory;
use miette::IntoDiagnostic;
use std::path::{Path, PathBuf};

fn main() -> miette::Result<()> {
    println!("cargo:rerun-if-changed=fixture.toml");

    let inventory = Inventory::load(Path::new("fixture.toml"))?;
    let config = CodegenConfig::from_settings(&inventory.codegen)?;
    let unit = generate_unit(&inventory, &config)?;

    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| miette::miette!("OUT_DIR is not set"))?;
    std::fs::write(out_dir.join("shim.rs"), unit.to_formatted_source()).into_diagnostic()?;
    std::fs::write(out_dir.join("exports.toml"), unit.export_table()?).into_diagnostic()?;
    Ok(())
}
