use crate::config::CodegenConfig;
use crate::policy::BoundaryType;
use ferry_types::TypeDescriptor;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Native Rust spelling of a descriptor.
pub fn native_type(ty: &TypeDescriptor) -> TokenStream {
    match ty {
        TypeDescriptor::Primitive(kind) => {
            let ident = format_ident!("{}", kind.rust_name());
            quote! { #ident }
        }
        TypeDescriptor::Pointer(inner) => {
            let inner = native_type(inner);
            quote! { *mut #inner }
        }
        TypeDescriptor::Named(named) => {
            let segments = named.segments().map(|segment| format_ident!("{}", segment));
            quote! { #(#segments)::* }
        }
        TypeDescriptor::Array(element) => {
            let element = native_type(element);
            quote! { ::std::vec::Vec<#element> }
        }
    }
}

/// Type of a boundary value in generated signatures.
pub fn boundary_type(ty: BoundaryType) -> TokenStream {
    match ty {
        BoundaryType::Scalar(kind) => {
            let ident = format_ident!("{}", kind.rust_name());
            quote! { #ident }
        }
        BoundaryType::Handle => quote! { i64 },
        BoundaryType::Text => quote! { *mut ::std::os::raw::c_char },
    }
}

/// The runtime crate path from the configuration, e.g. `::ferry_runtime`.
pub fn runtime_path(config: &CodegenConfig) -> TokenStream {
    let (absolute, segments) = config
        .runtime_segments()
        .unwrap_or((true, vec!["ferry_runtime"]));
    let segments = segments.iter().map(|segment| format_ident!("{}", segment));
    if absolute {
        quote! { :: #(#segments)::* }
    } else {
        quote! { #(#segments)::* }
    }
}
