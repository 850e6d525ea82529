//! Deterministic names for every boundary symbol in a unit.
//!
//! - functions: `<prefix>_fn_<path segments joined by __>` (leading `crate`
//!   dropped), e.g. `ferry_fn_geometry__scale`
//! - container bundles: `<prefix>_<canonical name of Vec<elem>>_<op>`, e.g.
//!   `ferry_slice_of_i64_item`
//! - registry entry points: `<prefix>_<op>`, e.g. `ferry_release`

use crate::error::{CodegenError, CodegenResult};
use ferry_types::{ExportedFunction, TypeDescriptor};
use rustc_hash::FxHashMap;

/// The six operations of a container bundle, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleOp {
    New,
    Str,
    Destroy,
    Item,
    ItemSet,
    ItemAppend,
}

impl BundleOp {
    pub fn suffix(self) -> &'static str {
        match self {
            BundleOp::New => "new",
            BundleOp::Str => "str",
            BundleOp::Destroy => "destroy",
            BundleOp::Item => "item",
            BundleOp::ItemSet => "item_set",
            BundleOp::ItemAppend => "item_append",
        }
    }
}

/// Registry entry points every unit exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOp {
    Initialize,
    Acquire,
    Release,
    TextFree,
}

impl RegistryOp {
    pub const ALL: [RegistryOp; 4] = [
        RegistryOp::Initialize,
        RegistryOp::Acquire,
        RegistryOp::Release,
        RegistryOp::TextFree,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            RegistryOp::Initialize => "initialize",
            RegistryOp::Acquire => "acquire",
            RegistryOp::Release => "release",
            RegistryOp::TextFree => "text_free",
        }
    }
}

pub fn function_symbol(prefix: &str, func: &ExportedFunction) -> String {
    let path = func
        .segments()
        .skip_while(|segment| *segment == "crate")
        .collect::<Vec<_>>()
        .join("__");
    format!("{}_fn_{}", prefix, path)
}

/// Name of the `#[repr(C)]` struct carrying a multi-result function's values.
pub fn results_struct(function_symbol: &str) -> String {
    format!("{}_results", function_symbol)
}

pub fn bundle_symbol(prefix: &str, element: &TypeDescriptor, op: BundleOp) -> String {
    let container = TypeDescriptor::array(element.clone());
    format!("{}_{}_{}", prefix, container.canonical_name(), op.suffix())
}

pub fn registry_symbol(prefix: &str, op: RegistryOp) -> String {
    format!("{}_{}", prefix, op.suffix())
}

/// Records every symbol claimed so far and what it was generated for.
#[derive(Debug, Default)]
pub struct SymbolTable {
    owners: FxHashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `symbol` for `owner`, failing if another owner already has it.
    pub fn claim(&mut self, symbol: &str, owner: impl Into<String>) -> CodegenResult<()> {
        let owner = owner.into();
        if let Some(first) = self.owners.get(symbol) {
            return Err(CodegenError::SymbolCollision {
                symbol: symbol.to_string(),
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(symbol.to_string(), owner);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_types::PrimitiveKind;

    #[test]
    fn test_function_symbols() {
        let scale = ExportedFunction::new("crate::geometry", "scale");
        assert_eq!(function_symbol("ferry", &scale), "ferry_fn_geometry__scale");

        let top = ExportedFunction::new("crate", "version");
        assert_eq!(function_symbol("geo", &top), "geo_fn_version");
        assert_eq!(results_struct("geo_fn_version"), "geo_fn_version_results");
    }

    #[test]
    fn test_bundle_symbols() {
        let i64_ty = TypeDescriptor::Primitive(PrimitiveKind::I64);
        assert_eq!(bundle_symbol("ferry", &i64_ty, BundleOp::New), "ferry_slice_of_i64_new");

        let point = TypeDescriptor::named("crate::geometry", "Point");
        assert_eq!(
            bundle_symbol("ferry", &point, BundleOp::ItemAppend),
            "ferry_slice_of_geometry__Point_item_append"
        );
    }

    #[test]
    fn test_registry_symbols() {
        let names: Vec<_> = RegistryOp::ALL
            .iter()
            .map(|op| registry_symbol("ferry", *op))
            .collect();
        assert_eq!(names, ["ferry_initialize", "ferry_acquire", "ferry_release", "ferry_text_free"]);
    }

    #[test]
    fn test_symbol_collision() {
        let mut table = SymbolTable::new();
        let a = ExportedFunction::new("crate::a__b", "c");
        let b = ExportedFunction::new("crate::a", "b__c");
        table.claim(&function_symbol("ferry", &a), a.path()).unwrap();
        match table.claim(&function_symbol("ferry", &b), b.path()) {
            Err(CodegenError::SymbolCollision { symbol, first, second }) => {
                assert_eq!(symbol, "ferry_fn_a__b__c");
                assert_eq!(first, "crate::a__b::c");
                assert_eq!(second, "crate::a::b__c");
            }
            other => panic!("expected a collision, got {other:?}"),
        }
    }
}
