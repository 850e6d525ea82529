use crate::config::CodegenConfig;
use crate::containers::{element_types, generate_bundle};
use crate::emit::EmitContext;
use crate::error::CodegenResult;
use crate::export::{export_table_toml, BoundarySignature};
use crate::naming::SymbolTable;
use crate::registry::generate_registry;
use crate::synth::synthesize;
use ferry_types::{Inventory, TypeDescriptor};
use proc_macro2::TokenStream;
use quote::quote;
use std::io::Write;
use std::process::{Command, Stdio};

/// One complete generated boundary unit.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    package: String,
    config: CodegenConfig,
    tokens: TokenStream,
    exports: Vec<BoundarySignature>,
    elements: Vec<TypeDescriptor>,
}

impl GeneratedUnit {
    /// Every boundary-callable symbol: registry entry points, then function
    /// wrappers, then container bundles.
    pub fn exports(&self) -> &[BoundarySignature] {
        &self.exports
    }

    /// Element types that received a container bundle.
    pub fn element_types(&self) -> &[TypeDescriptor] {
        &self.elements
    }

    /// Unformatted source text.
    pub fn to_source(&self) -> String {
        format!("{}{}\n", self.header(), self.tokens)
    }

    /// Source text run through rustfmt when enabled and available.
    pub fn to_formatted_source(&self) -> String {
        if self.config.rustfmt {
            format_rust_code(&self.to_source())
        } else {
            self.to_source()
        }
    }

    /// The export table as TOML for downstream glue generators.
    pub fn export_table(&self) -> CodegenResult<String> {
        export_table_toml(&self.package, self.config.target.name(), &self.exports)
    }

    fn header(&self) -> String {
        format!(
            "// Generated by ferry for package `{}` (target {}). Do not edit.\n\n",
            self.package, self.config.target
        )
    }
}

/// Builds the boundary unit for every function in `inventory`.
///
/// Any unsupported type or symbol collision aborts the whole unit.
pub fn generate_unit(inventory: &Inventory, config: &CodegenConfig) -> CodegenResult<GeneratedUnit> {
    config.validate()?;
    let ctx = EmitContext::new(config);
    let mut symbols = SymbolTable::new();
    let mut exports = Vec::new();

    let registry = generate_registry(&ctx);
    for signature in &registry.signatures {
        symbols.claim(&signature.symbol, "the registry")?;
    }
    exports.extend(registry.signatures);

    let mut functions = Vec::with_capacity(inventory.functions().len());
    for func in inventory.functions() {
        let synthesized = synthesize(&ctx, func)?;
        symbols.claim(&synthesized.symbol, format!("function `{}`", func.path()))?;
        exports.push(synthesized.signature);
        functions.push(synthesized.tokens);
    }

    let elements = element_types(inventory.functions());
    let mut bundles = Vec::with_capacity(elements.len());
    for element in &elements {
        let bundle = generate_bundle(&ctx, element)?;
        for signature in &bundle.signatures {
            symbols.claim(&signature.symbol, format!("the container of `{}`", element))?;
        }
        exports.extend(bundle.signatures);
        bundles.push(bundle.tokens);
    }

    log::info!(
        "Generated unit for `{}`: {} function(s), {} container bundle(s), {} symbol(s)",
        inventory.name,
        functions.len(),
        bundles.len(),
        symbols.len()
    );

    let registry_tokens = registry.tokens;
    let tokens = quote! {
        #registry_tokens
        #(#functions)*
        #(#bundles)*
    };

    Ok(GeneratedUnit {
        package: inventory.name.clone(),
        config: config.clone(),
        tokens,
        exports,
        elements,
    })
}

/// Formats Rust source with rustfmt, returning the input unchanged if rustfmt
/// is missing or rejects it.
pub fn format_rust_code(code: &str) -> String {
    let child = Command::new("rustfmt")
        .arg("--edition")
        .arg("2021")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            log::debug!("rustfmt unavailable ({}), keeping unformatted source", err);
            return code.to_string();
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(code.as_bytes());
    }
    match child.wait_with_output() {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| code.to_string())
        }
        _ => {
            log::warn!("rustfmt failed, keeping unformatted source");
            code.to_string()
        }
    }
}
