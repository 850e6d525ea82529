//! Container bundles: six boundary operations per element type.
//!
//! Elements move in and out of a container under the same policies a
//! function parameter or result of the element type would get, so `item` on
//! a container of named values hands out a fresh owned handle that the
//! caller releases.

use crate::emit::EmitContext;
use crate::error::{CodegenError, CodegenResult};
use crate::export::{BoundarySignature, SymbolKind};
use crate::naming::{bundle_symbol, BundleOp};
use crate::policy::{BoundaryType, ParamPolicy, ResultPolicy};
use crate::types::{boundary_type, native_type};
use ferry_types::{ExportedFunction, PrimitiveKind, TypeDescriptor};
use indexmap::IndexSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Generated items for one element type.
#[derive(Debug, Clone)]
pub struct ContainerBundle {
    pub element: TypeDescriptor,
    pub tokens: TokenStream,
    pub signatures: Vec<BoundarySignature>,
}

/// Every element type of every array reachable from `functions`, in first-seen
/// order and without duplicates.
pub fn element_types<'a>(functions: impl IntoIterator<Item = &'a ExportedFunction>) -> Vec<TypeDescriptor> {
    let mut elements = IndexSet::new();
    for func in functions {
        for ty in func.types() {
            for node in ty.walk() {
                if let Some(element) = node.element() {
                    elements.insert(element.clone());
                }
            }
        }
    }
    elements.into_iter().collect()
}

pub fn generate_bundle(ctx: &EmitContext, element: &TypeDescriptor) -> CodegenResult<ContainerBundle> {
    let unsupported = |reason: &'static str| CodegenError::UnsupportedParam {
        function: format!("container of {}", element),
        param: "value".to_string(),
        ty: element.to_string(),
        reason,
    };
    let param = ParamPolicy::for_type(element).map_err(unsupported)?;
    let result = ResultPolicy::for_type(element).map_err(unsupported)?;

    let rt = &ctx.rt;
    let registry = &ctx.registry;
    let native = native_type(element);
    let handle_arg = format_ident!("handle");
    let handle = ctx.handle(&handle_arg);
    let value_in = boundary_type(param.boundary());
    let value_out = boundary_type(result.boundary());
    let text = boundary_type(BoundaryType::Text);
    let imported = ctx.import(&param, &quote! { value });
    let exported = ctx.export(&result, &quote! { value });

    let symbol = |op| bundle_symbol(&ctx.prefix, element, op);
    let ident = |op| format_ident!("{}", symbol(op));
    let (new, str_, destroy, item, item_set, item_append) = (
        ident(BundleOp::New),
        ident(BundleOp::Str),
        ident(BundleOp::Destroy),
        ident(BundleOp::Item),
        ident(BundleOp::ItemSet),
        ident(BundleOp::ItemAppend),
    );

    let tokens = quote! {
        #[no_mangle]
        pub extern "C" fn #new() -> i64 {
            #rt::container::new::<#native>(&#registry).raw()
        }

        #[no_mangle]
        pub extern "C" fn #str_(handle: i64) -> #text {
            let text = unsafe { #rt::container::describe::<#native>(&#registry, #handle) };
            #rt::marshal::export_text(text)
        }

        #[no_mangle]
        pub extern "C" fn #destroy(handle: i64) {
            #rt::container::destroy(&#registry, #handle);
        }

        #[no_mangle]
        pub extern "C" fn #item(handle: i64, index: usize) -> #value_out {
            let value = unsafe { #rt::container::item::<#native>(&#registry, #handle, index) };
            #exported
        }

        #[no_mangle]
        pub extern "C" fn #item_set(handle: i64, index: usize, value: #value_in) {
            let value: #native = #imported;
            unsafe { #rt::container::item_set::<#native>(&#registry, #handle, index, value) }
        }

        #[no_mangle]
        pub extern "C" fn #item_append(handle: i64, value: #value_in) {
            let value: #native = #imported;
            unsafe { #rt::container::item_append::<#native>(&#registry, #handle, value) }
        }
    };

    let source = element.to_string();
    let index = BoundaryType::Scalar(PrimitiveKind::Usize);
    let signatures = vec![
        BoundarySignature::new(symbol(BundleOp::New), SymbolKind::Container)
            .source(&source)
            .result(BoundaryType::Handle),
        BoundarySignature::new(symbol(BundleOp::Str), SymbolKind::Container)
            .source(&source)
            .param("handle", BoundaryType::Handle)
            .result(BoundaryType::Text),
        BoundarySignature::new(symbol(BundleOp::Destroy), SymbolKind::Container)
            .source(&source)
            .param("handle", BoundaryType::Handle),
        BoundarySignature::new(symbol(BundleOp::Item), SymbolKind::Container)
            .source(&source)
            .param("handle", BoundaryType::Handle)
            .param("index", index)
            .result(result.boundary()),
        BoundarySignature::new(symbol(BundleOp::ItemSet), SymbolKind::Container)
            .source(&source)
            .param("handle", BoundaryType::Handle)
            .param("index", index)
            .param("value", param.boundary()),
        BoundarySignature::new(symbol(BundleOp::ItemAppend), SymbolKind::Container)
            .source(&source)
            .param("handle", BoundaryType::Handle)
            .param("value", param.boundary()),
    ];

    log::trace!("Generated container bundle for {}", source);
    Ok(ContainerBundle {
        element: element.clone(),
        tokens,
        signatures,
    })
}
