use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort generation of a boundary unit.
///
/// Generation fails closed: no partial unit is ever returned alongside one of
/// these.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    #[error("Result {index} of `{function}` has type `{ty}`, which cannot cross the boundary: {reason}")]
    #[diagnostic(
        code("CODEGEN-001"),
        help("Results may be primitives, pointers to non-pointer types, named types or Vec<T>")
    )]
    UnsupportedResult {
        function: String,
        index: usize,
        ty: String,
        reason: &'static str,
    },

    #[error("Parameter `{param}` of `{function}` has type `{ty}`, which cannot cross the boundary: {reason}")]
    #[diagnostic(
        code("CODEGEN-002"),
        help("Parameters may be primitives, pointers to non-pointer types, named types or Vec<T>")
    )]
    UnsupportedParam {
        function: String,
        param: String,
        ty: String,
        reason: &'static str,
    },

    #[error("Symbol `{symbol}` is generated for both {first} and {second}")]
    #[diagnostic(
        code("CODEGEN-003"),
        help("Rename one of the functions or move it to another namespace")
    )]
    SymbolCollision {
        symbol: String,
        first: String,
        second: String,
    },

    #[error("I don't know how to generate bindings for target `{0}`")]
    #[diagnostic(code("CODEGEN-004"), help("The only known target is `c-abi`"))]
    UnknownTarget(String),

    #[error("Invalid codegen setting `{field}` = `{value}`: {reason}")]
    #[diagnostic(code("CODEGEN-005"))]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Failed to render the export table")]
    #[diagnostic(code("CODEGEN-006"))]
    ExportTable(#[from] toml::ser::Error),

    #[error("Parameter `{param}` of `{function}` would shadow the registry static `{registry}`")]
    #[diagnostic(
        code("CODEGEN-007"),
        help("Rename the parameter or set `registry_static` in the [codegen] table")
    )]
    ParamShadowsRegistry {
        function: String,
        param: String,
        registry: String,
    },
}

pub type CodegenResult<T> = Result<T, CodegenError>;
