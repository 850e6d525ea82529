use crate::emit::EmitContext;
use crate::export::{BoundarySignature, SymbolKind};
use crate::naming::{registry_symbol, RegistryOp};
use crate::policy::BoundaryType;
use crate::types::boundary_type;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// The unit's registry static and its boundary entry points.
pub struct RegistryItems {
    pub tokens: TokenStream,
    pub signatures: Vec<BoundarySignature>,
}

pub fn generate_registry(ctx: &EmitContext) -> RegistryItems {
    let rt = &ctx.rt;
    let registry = &ctx.registry;
    let handle_arg = format_ident!("handle");
    let handle = ctx.handle(&handle_arg);
    let text = boundary_type(BoundaryType::Text);
    let ident = |op| format_ident!("{}", registry_symbol(&ctx.prefix, op));
    let (initialize, acquire, release, text_free) = (
        ident(RegistryOp::Initialize),
        ident(RegistryOp::Acquire),
        ident(RegistryOp::Release),
        ident(RegistryOp::TextFree),
    );

    let tokens = quote! {
        pub static #registry: #rt::Registry = #rt::Registry::new();

        /// Must run once before any other boundary call.
        #[no_mangle]
        pub extern "C" fn #initialize() {
            #registry.initialize();
        }

        #[no_mangle]
        pub extern "C" fn #acquire(handle: i64) -> i64 {
            #registry.retain(#handle).raw()
        }

        #[no_mangle]
        pub extern "C" fn #release(handle: i64) {
            #registry.release(#handle);
        }

        /// # Safety
        ///
        /// `text` must come from this unit and not have been freed.
        #[no_mangle]
        pub unsafe extern "C" fn #text_free(text: #text) {
            #rt::marshal::free_text(text)
        }
    };

    let symbol = |op| registry_symbol(&ctx.prefix, op);
    let signatures = vec![
        BoundarySignature::new(symbol(RegistryOp::Initialize), SymbolKind::Registry),
        BoundarySignature::new(symbol(RegistryOp::Acquire), SymbolKind::Registry)
            .param("handle", BoundaryType::Handle)
            .result(BoundaryType::Handle),
        BoundarySignature::new(symbol(RegistryOp::Release), SymbolKind::Registry)
            .param("handle", BoundaryType::Handle),
        BoundarySignature::new(symbol(RegistryOp::TextFree), SymbolKind::Registry)
            .param("text", BoundaryType::Text),
    ];

    RegistryItems { tokens, signatures }
}
