//! Binding synthesis: one boundary wrapper per exported function.
//!
//! A wrapper converts each boundary argument per its [`ParamPolicy`], calls
//! the native function once, and converts each result per its
//! [`ResultPolicy`]. Functions never interact, so synthesis is per-function
//! and order-independent.

use crate::emit::EmitContext;
use crate::error::{CodegenError, CodegenResult};
use crate::export::{BoundarySignature, SymbolKind};
use crate::naming::{function_symbol, results_struct};
use crate::policy::{ParamPolicy, ResultPolicy};
use crate::types::boundary_type;
use ferry_types::ExportedFunction;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Generated items for one exported function.
#[derive(Debug, Clone)]
pub struct SynthesizedFunction {
    pub symbol: String,
    pub tokens: TokenStream,
    pub signature: BoundarySignature,
}

/// Decides every parameter and result policy, failing on the first type
/// with none.
pub fn policies(func: &ExportedFunction) -> CodegenResult<(Vec<ParamPolicy>, Vec<ResultPolicy>)> {
    let params = func
        .params
        .iter()
        .map(|param| {
            ParamPolicy::for_type(&param.ty).map_err(|reason| CodegenError::UnsupportedParam {
                function: func.path(),
                param: param.name.clone(),
                ty: param.ty.to_string(),
                reason,
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;
    let results = func
        .results
        .iter()
        .enumerate()
        .map(|(index, ty)| {
            ResultPolicy::for_type(ty).map_err(|reason| CodegenError::UnsupportedResult {
                function: func.path(),
                index,
                ty: ty.to_string(),
                reason,
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;
    Ok((params, results))
}

pub fn synthesize(ctx: &EmitContext, func: &ExportedFunction) -> CodegenResult<SynthesizedFunction> {
    let (param_policies, result_policies) = policies(func)?;
    let symbol = function_symbol(&ctx.prefix, func);
    let wrapper = format_ident!("{}", symbol);

    let mut signature = BoundarySignature::new(&symbol, SymbolKind::Function).source(func.path());
    let mut boundary_params = Vec::with_capacity(func.params.len());
    let mut args = Vec::with_capacity(func.params.len());
    for (param, policy) in func.params.iter().zip(&param_policies) {
        // Bindings may not shadow statics.
        if ctx.registry == param.name {
            return Err(CodegenError::ParamShadowsRegistry {
                function: func.path(),
                param: param.name.clone(),
                registry: ctx.registry.to_string(),
            });
        }
        let ident = format_ident!("{}", param.name);
        let ty = boundary_type(policy.boundary());
        boundary_params.push(quote! { #ident: #ty });
        args.push(ctx.import(policy, &quote! { #ident }));
        signature = signature.param(&param.name, policy.boundary());
    }
    for policy in &result_policies {
        signature = signature.result(policy.boundary());
    }

    let path = func.segments().map(|segment| format_ident!("{}", segment));
    let call = quote! { #(#path)::*(#(#args),*) };

    let tokens = match result_policies.as_slice() {
        [] => quote! {
            #[no_mangle]
            pub extern "C" fn #wrapper(#(#boundary_params),*) {
                #call;
            }
        },
        [policy @ ResultPolicy::Scalar(_)] => {
            let ret = boundary_type(policy.boundary());
            quote! {
                #[no_mangle]
                pub extern "C" fn #wrapper(#(#boundary_params),*) -> #ret {
                    #call
                }
            }
        }
        [policy] => {
            let ret = boundary_type(policy.boundary());
            let exported = ctx.export(policy, &quote! { result });
            quote! {
                #[no_mangle]
                pub extern "C" fn #wrapper(#(#boundary_params),*) -> #ret {
                    let result = #call;
                    #exported
                }
            }
        }
        many => {
            let results = format_ident!("{}", results_struct(&symbol));
            let fields: Vec<_> = (0..many.len()).map(|index| format_ident!("r{}", index)).collect();
            let field_types = many.iter().map(|policy| boundary_type(policy.boundary()));
            let bindings: Vec<_> = (0..many.len())
                .map(|index| format_ident!("result_{}", index))
                .collect();
            let exported = many
                .iter()
                .zip(&bindings)
                .map(|(policy, binding)| ctx.export(policy, &quote! { #binding }));
            quote! {
                #[repr(C)]
                #[derive(Debug, Clone, Copy)]
                #[allow(non_camel_case_types)]
                pub struct #results {
                    #(pub #fields: #field_types),*
                }

                #[no_mangle]
                pub extern "C" fn #wrapper(#(#boundary_params),*) -> #results {
                    let (#(#bindings),*) = #call;
                    #results {
                        #(#fields: #exported),*
                    }
                }
            }
        }
    };

    log::trace!("Synthesized {} for {}", symbol, func.path());
    Ok(SynthesizedFunction {
        symbol,
        tokens,
        signature,
    })
}
