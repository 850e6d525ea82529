use crate::commands::load;
use crate::error::CliError;
use ferry_codegen::generate_unit;
use std::path::Path;

pub fn handle_inspect(manifest: &Path) -> Result<(), CliError> {
    let (inventory, config) = load(manifest)?;
    let unit = generate_unit(&inventory, &config)?;

    println!("package {} (target {})", inventory.name, config.target);
    for signature in unit.exports() {
        println!("  {}", signature);
    }
    Ok(())
}
