use crate::error::CodegenResult;
use crate::policy::BoundaryType;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Registry,
    Function,
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: BoundaryType,
}

/// One boundary-callable symbol of a generated unit, as downstream glue sees
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundarySignature {
    pub symbol: String,
    pub kind: SymbolKind,
    /// Native function path or container element type the symbol wraps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub results: Vec<BoundaryType>,
    pub params: Vec<BoundaryParam>,
}

impl BoundarySignature {
    pub fn new(symbol: impl Into<String>, kind: SymbolKind) -> Self {
        BoundarySignature {
            symbol: symbol.into(),
            kind,
            source: None,
            results: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: BoundaryType) -> Self {
        self.params.push(BoundaryParam {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn result(mut self, ty: BoundaryType) -> Self {
        self.results.push(ty);
        self
    }
}

impl fmt::Display for BoundarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.symbol)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {}", single),
            many => {
                f.write_str(" -> (")?;
                for (index, ty) in many.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Serialize)]
struct ExportTable<'a> {
    package: &'a str,
    target: &'a str,
    #[serde(rename = "symbol")]
    symbols: &'a [BoundarySignature],
}

/// Renders the export table as TOML, one `[[symbol]]` table per entry.
pub fn export_table_toml(
    package: &str,
    target: &str,
    symbols: &[BoundarySignature],
) -> CodegenResult<String> {
    let table = ExportTable {
        package,
        target,
        symbols,
    };
    Ok(toml::to_string(&table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_types::PrimitiveKind;

    #[test]
    fn test_signature_display() {
        let area = BoundarySignature::new("ferry_fn_area", SymbolKind::Function)
            .param("shape", BoundaryType::Handle)
            .result(BoundaryType::Scalar(PrimitiveKind::F64));
        assert_eq!(area.to_string(), "ferry_fn_area(shape: handle) -> f64");

        let release = BoundarySignature::new("ferry_release", SymbolKind::Registry)
            .param("handle", BoundaryType::Handle);
        assert_eq!(release.to_string(), "ferry_release(handle: handle)");

        let bounds = BoundarySignature::new("ferry_fn_bounds", SymbolKind::Function)
            .result(BoundaryType::Scalar(PrimitiveKind::F64))
            .result(BoundaryType::Handle);
        assert_eq!(bounds.to_string(), "ferry_fn_bounds() -> (f64, handle)");
    }

    #[test]
    fn test_export_table_toml() {
        let symbols = vec![BoundarySignature::new("ferry_fn_area", SymbolKind::Function)
            .source("crate::area")
            .param("shape", BoundaryType::Handle)
            .result(BoundaryType::Scalar(PrimitiveKind::F64))];
        let rendered = export_table_toml("shapes", "c-abi", &symbols).unwrap();
        assert!(rendered.contains("package = \"shapes\""));
        assert!(rendered.contains("[[symbol]]"));
        assert!(rendered.contains("symbol = \"ferry_fn_area\""));
        assert!(rendered.contains("kind = \"function\""));
        assert!(rendered.contains("results = [\"f64\"]"));

        let parsed: toml::Value = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed["symbol"][0]["params"][0]["type"].as_str(), Some("handle"));
    }
}
