use ferry_codegen::CodegenError;
use ferry_types::InventoryError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the `ferry` binary.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to write {path}")]
    #[diagnostic(code(ferry::cli::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),
}
