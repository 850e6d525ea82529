use crate::config::CodegenConfig;
use crate::policy::{ParamPolicy, ResultPolicy};
use crate::types::{native_type, runtime_path};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Paths shared by every item emitted into one unit.
pub struct EmitContext {
    pub prefix: String,
    /// Runtime crate path, e.g. `::ferry_runtime`.
    pub rt: TokenStream,
    /// The unit's registry static.
    pub registry: Ident,
}

impl EmitContext {
    pub fn new(config: &CodegenConfig) -> Self {
        EmitContext {
            prefix: config.prefix.clone(),
            rt: runtime_path(config),
            registry: format_ident!("{}", config.registry_static),
        }
    }

    /// Expression turning boundary value `value` into its native form.
    pub fn import(&self, policy: &ParamPolicy, value: &TokenStream) -> TokenStream {
        let rt = &self.rt;
        let registry = &self.registry;
        match policy {
            ParamPolicy::Scalar(_) => value.clone(),
            ParamPolicy::Pointer(pointee) => {
                let pointee = native_type(pointee);
                quote! { #rt::marshal::import_ptr::<#pointee>(&#registry, #value) }
            }
            ParamPolicy::Clone(ty) => {
                let ty = native_type(ty);
                quote! { unsafe { #rt::marshal::import_clone::<#ty>(&#registry, #value) } }
            }
        }
    }

    /// Expression turning native value `value` into its boundary form.
    pub fn export(&self, policy: &ResultPolicy, value: &TokenStream) -> TokenStream {
        let rt = &self.rt;
        let registry = &self.registry;
        match policy {
            ResultPolicy::Scalar(_) => value.clone(),
            ResultPolicy::Pointer(pointee) => {
                let pointee = native_type(pointee);
                quote! { #rt::marshal::export_ptr::<#pointee>(&#registry, #value) }
            }
            ResultPolicy::Owned => quote! { #rt::marshal::export_owned(&#registry, #value) },
        }
    }

    /// Expression building a runtime `Handle` from a boundary `i64`.
    pub fn handle(&self, value: &Ident) -> TokenStream {
        let rt = &self.rt;
        quote! { #rt::Handle::from_raw(#value) }
    }
}
