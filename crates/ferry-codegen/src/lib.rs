//! Generates the boundary unit for a native package.
//!
//! Given an [`Inventory`](ferry_types::Inventory), [`generate_unit`] emits one
//! Rust source unit containing:
//!
//! - a registry static and its `initialize`/`acquire`/`release` entry points
//!   (plus `text_free` for strings handed out by container `str`),
//! - one `extern "C"` wrapper per exported function,
//! - one six-function container bundle per distinct element type.
//!
//! Every generated signature uses only primitive scalars and `i64` handle
//! ids. The [`GeneratedUnit::export_table`] lists them for downstream glue.

mod config;
mod containers;
mod emit;
mod error;
mod export;
mod naming;
mod policy;
mod registry;
mod synth;
mod types;
mod unit;

pub use config::{CodegenConfig, Target};
pub use containers::{element_types, generate_bundle, ContainerBundle};
pub use emit::EmitContext;
pub use error::{CodegenError, CodegenResult};
pub use export::{export_table_toml, BoundaryParam, BoundarySignature, SymbolKind};
pub use naming::{bundle_symbol, function_symbol, registry_symbol, BundleOp, RegistryOp, SymbolTable};
pub use policy::{BoundaryType, ParamPolicy, ResultPolicy};
pub use synth::{synthesize, SynthesizedFunction};
pub use unit::{format_rust_code, generate_unit, GeneratedUnit};
