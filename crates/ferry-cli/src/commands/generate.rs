use crate::commands::load;
use crate::error::CliError;
use ferry_codegen::{generate_unit, Target};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct GenerateOptions {
    pub manifest: PathBuf,
    pub output: Option<PathBuf>,
    pub exports: Option<PathBuf>,
    pub target: Option<String>,
    pub no_fmt: bool,
}

pub fn handle_generate(options: GenerateOptions) -> Result<(), CliError> {
    let (inventory, mut config) = load(&options.manifest)?;
    if let Some(name) = &options.target {
        config.target = Target::parse(name)?;
    }
    if options.no_fmt {
        config.rustfmt = false;
    }

    let unit = generate_unit(&inventory, &config)?;
    let source = unit.to_formatted_source();
    match &options.output {
        Some(path) => {
            write(path, &source)?;
            log::info!("Wrote {} symbol(s) to {}", unit.exports().len(), path.display());
        }
        None => print!("{}", source),
    }

    if let Some(path) = &options.exports {
        write(path, &unit.export_table()?)?;
        log::info!("Wrote export table to {}", path.display());
    }
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
