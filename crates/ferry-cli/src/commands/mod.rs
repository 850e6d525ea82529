pub mod generate;
pub mod inspect;

use crate::error::CliError;
use ferry_codegen::CodegenConfig;
use ferry_types::Inventory;
use std::path::Path;

/// Loads a manifest and resolves its `[codegen]` table.
pub fn load(manifest: &Path) -> Result<(Inventory, CodegenConfig), CliError> {
    let inventory = Inventory::load(manifest)?;
    let config = CodegenConfig::from_settings(&inventory.codegen)?;
    Ok((inventory, config))
}
