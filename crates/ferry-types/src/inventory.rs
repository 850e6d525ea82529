//! Loading a package's exported surface from a TOML manifest.
//!
//! The manifest names the package, the default namespace used to resolve
//! bare type names, every exported function, and optional generator settings:
//!
//! ```toml
//! [package]
//! name = "geometry"
//! namespace = "crate::geometry"
//!
//! [[function]]
//! name = "scale"
//! params = [{ name = "p", type = "Point" }, { name = "k", type = "f64" }]
//! results = ["Point"]
//!
//! [codegen]
//! prefix = "ferry"
//! ```

use crate::descriptor::TypeDescriptor;
use crate::function::{ExportedFunction, Param};
use crate::parse::{is_identifier, parse_type, TypeParseError};
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a package inventory.
#[derive(Debug, Error, Diagnostic)]
pub enum InventoryError {
    #[error("Failed to read manifest {path}")]
    #[diagnostic(code("INVENTORY-001"), help("Check that the manifest exists and is readable"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code("INVENTORY-002"), help("Check the manifest's TOML syntax and field names"))]
    Syntax {
        message: String,
        #[source_code]
        src: String,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid type for {position} of `{function}`")]
    #[diagnostic(code("INVENTORY-003"))]
    InvalidType {
        function: String,
        position: String,
        #[source]
        source: TypeParseError,
    },

    #[error("Function `{0}` is exported more than once")]
    #[diagnostic(code("INVENTORY-004"))]
    DuplicateFunction(String),

    #[error("`{name}` is not a valid {what} name (in `{context}`)")]
    #[diagnostic(
        code("INVENTORY-005"),
        help("Names must be plain ASCII identifiers that are not Rust keywords")
    )]
    InvalidName {
        what: &'static str,
        name: String,
        context: String,
    },

    #[error("Parameter `{param}` of `{function}` is declared more than once")]
    #[diagnostic(code("INVENTORY-006"))]
    DuplicateParam { function: String, param: String },
}

/// Generator settings carried by the manifest's optional `[codegen]` table.
///
/// Unset fields fall back to the generator's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodegenSettings {
    /// Prefix for every generated boundary symbol.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Path the generated unit uses to reach the runtime crate.
    #[serde(default)]
    pub runtime_path: Option<String>,

    /// Name of the registry static emitted into the unit.
    #[serde(default)]
    pub registry_static: Option<String>,

    /// Whether to run rustfmt over the generated source.
    #[serde(default)]
    pub rustfmt: Option<bool>,

    /// Output target requested by the manifest.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    package: PackageSection,
    #[serde(default, rename = "function")]
    functions: Vec<FunctionSection>,
    #[serde(default)]
    codegen: CodegenSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageSection {
    name: String,
    #[serde(default = "default_namespace")]
    namespace: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionSection {
    name: String,
    /// Overrides the package namespace for this function only.
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    params: Vec<ParamSection>,
    #[serde(default)]
    results: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamSection {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

fn default_namespace() -> String {
    "crate".to_string()
}

/// The exported surface of one native package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub name: String,
    pub namespace: String,
    functions: Vec<ExportedFunction>,
    pub codegen: CodegenSettings,
}

impl Inventory {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Inventory {
            name: name.into(),
            namespace: namespace.into(),
            functions: Vec::new(),
            codegen: CodegenSettings::default(),
        }
    }

    /// Reads and validates a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let src = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading inventory from {}", path.display());
        Self::from_toml_str(&src)
    }

    /// Parses and validates a manifest held in memory.
    pub fn from_toml_str(src: &str) -> Result<Self, InventoryError> {
        let manifest: Manifest = toml::from_str(src).map_err(|err| InventoryError::Syntax {
            message: err.message().to_string(),
            src: src.to_string(),
            span: err.span().map(SourceSpan::from),
        })?;

        if manifest.package.name.trim().is_empty() {
            return Err(InventoryError::InvalidName {
                what: "package",
                name: manifest.package.name,
                context: "[package]".to_string(),
            });
        }
        validate_namespace(&manifest.package.namespace, "[package]")?;

        let mut inventory = Inventory::new(manifest.package.name, manifest.package.namespace);
        inventory.codegen = manifest.codegen;
        for section in manifest.functions {
            let func = inventory.build_function(section)?;
            inventory.push(func)?;
        }
        log::debug!(
            "Inventory `{}` exports {} function(s)",
            inventory.name,
            inventory.functions.len()
        );
        Ok(inventory)
    }

    /// Adds a function, rejecting a second export under the same path.
    pub fn push(&mut self, func: ExportedFunction) -> Result<(), InventoryError> {
        if self.functions.iter().any(|existing| existing.path() == func.path()) {
            return Err(InventoryError::DuplicateFunction(func.path()));
        }
        self.functions.push(func);
        Ok(())
    }

    /// Exported functions in manifest order.
    pub fn functions(&self) -> &[ExportedFunction] {
        &self.functions
    }

    fn build_function(&self, section: FunctionSection) -> Result<ExportedFunction, InventoryError> {
        let namespace = section.namespace.unwrap_or_else(|| self.namespace.clone());
        validate_namespace(&namespace, &section.name)?;
        if !is_identifier(&section.name) {
            return Err(InventoryError::InvalidName {
                what: "function",
                name: section.name.clone(),
                context: namespace,
            });
        }

        let mut func = ExportedFunction::new(namespace, section.name);
        let mut seen = HashSet::new();
        for param in section.params {
            if !is_identifier(&param.name) {
                return Err(InventoryError::InvalidName {
                    what: "parameter",
                    name: param.name,
                    context: func.path(),
                });
            }
            if !seen.insert(param.name.clone()) {
                return Err(InventoryError::DuplicateParam {
                    function: func.path(),
                    param: param.name,
                });
            }
            let ty = self.resolve(&func, &param.ty, format!("parameter `{}`", param.name))?;
            func.params.push(Param { name: param.name, ty });
        }
        for (index, result) in section.results.iter().enumerate() {
            let ty = self.resolve(&func, result, format!("result {}", index))?;
            func.results.push(ty);
        }
        Ok(func)
    }

    fn resolve(
        &self,
        func: &ExportedFunction,
        text: &str,
        position: String,
    ) -> Result<TypeDescriptor, InventoryError> {
        parse_type(text, &self.namespace).map_err(|source| InventoryError::InvalidType {
            function: func.path(),
            position,
            source,
        })
    }
}

fn validate_namespace(namespace: &str, context: &str) -> Result<(), InventoryError> {
    if namespace.is_empty() {
        return Ok(());
    }
    for (index, segment) in namespace.split("::").enumerate() {
        let path_keyword = index == 0 && matches!(segment, "crate" | "self" | "super");
        if !path_keyword && !is_identifier(segment) {
            return Err(InventoryError::InvalidName {
                what: "namespace",
                name: namespace.to_string(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}
