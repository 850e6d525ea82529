use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use thiserror::Error;

/// Errors produced while turning a type expression into a [`TypeDescriptor`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,

    #[error("type `{text}` cannot cross the boundary: {reason}")]
    UnsupportedType { text: String, reason: &'static str },

    #[error("`{segment}` in type `{text}` is not a valid identifier")]
    InvalidIdentifier { text: String, segment: String },
}

// Strict and reserved keywords that would not survive as path segments in
// generated code.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield", "Self",
];

const PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Returns true if `text` is a plain ASCII Rust identifier that is not a keyword.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let starts_ok = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || c == '_',
        None => false,
    };
    starts_ok
        && text != "_"
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&text)
        && !PATH_KEYWORDS.contains(&text)
}

impl TypeDescriptor {
    /// See [`parse_type`].
    pub fn parse(text: &str, default_namespace: &str) -> Result<TypeDescriptor, TypeParseError> {
        parse_type(text, default_namespace)
    }
}

/// Parses a type expression as written in a package manifest.
///
/// Bare type names resolve against `default_namespace`.
pub fn parse_type(text: &str, default_namespace: &str) -> Result<TypeDescriptor, TypeParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TypeParseError::Empty);
    }
    let unsupported = |reason| TypeParseError::UnsupportedType {
        text: trimmed.to_string(),
        reason,
    };

    if let Some(inner) = trimmed
        .strip_prefix("*mut ")
        .or_else(|| trimmed.strip_prefix("*const "))
    {
        return Ok(TypeDescriptor::pointer(parse_type(inner, default_namespace)?));
    }

    if let Some(inner) = trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        if inner.contains(';') {
            return Err(unsupported("fixed-size arrays have no container bundle"));
        }
        return Ok(TypeDescriptor::array(parse_type(inner, default_namespace)?));
    }

    if let Some(inner) = trimmed.strip_prefix("Vec<").and_then(|rest| rest.strip_suffix('>')) {
        return Ok(TypeDescriptor::array(parse_type(inner, default_namespace)?));
    }

    if let Some(kind) = PrimitiveKind::from_name(trimmed) {
        return Ok(TypeDescriptor::Primitive(kind));
    }

    if trimmed.starts_with('&') {
        return Err(unsupported("references have no boundary representation"));
    }
    if trimmed.starts_with("fn") && trimmed.contains('(') {
        return Err(unsupported("function types have no boundary representation"));
    }
    if trimmed.starts_with('(') {
        return Err(unsupported("tuples have no boundary representation"));
    }
    if trimmed.starts_with("dyn ") || trimmed.starts_with("impl ") {
        return Err(unsupported("trait objects have no boundary representation"));
    }
    if trimmed.contains('<') {
        return Err(unsupported("only Vec<T> is supported among generic types"));
    }
    match trimmed {
        "char" | "str" => return Err(unsupported("not a boundary scalar")),
        "String" | "Box" | "Option" | "Result" => {
            return Err(unsupported("prelude types must be spelled with their full path"))
        }
        _ => {}
    }

    let segments: Vec<&str> = trimmed.split("::").collect();
    let (name, namespace) = match segments.split_last() {
        Some((name, namespace)) => (*name, namespace),
        None => return Err(TypeParseError::Empty),
    };
    for (index, segment) in segments.iter().enumerate() {
        let leading_path_keyword = index == 0 && PATH_KEYWORDS.contains(segment) && segments.len() > 1;
        if !leading_path_keyword && !is_identifier(segment) {
            return Err(TypeParseError::InvalidIdentifier {
                text: trimmed.to_string(),
                segment: segment.to_string(),
            });
        }
    }

    if namespace.is_empty() {
        Ok(TypeDescriptor::named(default_namespace, name))
    } else {
        Ok(TypeDescriptor::named(namespace.join("::"), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "crate::geometry";

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse_type("i64", NS), Ok(TypeDescriptor::Primitive(PrimitiveKind::I64)));
        assert_eq!(parse_type("  bool ", NS), Ok(TypeDescriptor::Primitive(PrimitiveKind::Bool)));
    }

    #[test]
    fn test_parse_composites() {
        let point = TypeDescriptor::named(NS, "Point");
        assert_eq!(parse_type("Point", NS), Ok(point.clone()));
        assert_eq!(parse_type("*mut Point", NS), Ok(TypeDescriptor::pointer(point.clone())));
        assert_eq!(parse_type("*const Point", NS), Ok(TypeDescriptor::pointer(point.clone())));
        assert_eq!(parse_type("Vec<Point>", NS), Ok(TypeDescriptor::array(point.clone())));
        assert_eq!(parse_type("[Point]", NS), Ok(TypeDescriptor::array(point)));
        assert_eq!(
            parse_type("Vec<Vec<f32>>", NS),
            Ok(TypeDescriptor::array(TypeDescriptor::array(TypeDescriptor::Primitive(
                PrimitiveKind::F32
            ))))
        );
    }

    #[test]
    fn test_parse_qualified_paths() {
        assert_eq!(
            parse_type("std::string::String", NS),
            Ok(TypeDescriptor::named("std::string", "String"))
        );
        assert_eq!(
            parse_type("crate::shapes::Circle", NS),
            Ok(TypeDescriptor::named("crate::shapes", "Circle"))
        );
    }

    #[test]
    fn test_parse_rejects_unsupported_shapes() {
        for text in ["fn(i32) -> i32", "&Point", "(i32, i32)", "dyn Shape", "Option<i32>", "char", "String", "[u8; 4]"] {
            match parse_type(text, NS) {
                Err(TypeParseError::UnsupportedType { .. }) => {}
                other => panic!("expected {text} to be unsupported, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_bad_identifiers() {
        assert_eq!(parse_type("", NS), Err(TypeParseError::Empty));
        assert!(matches!(
            parse_type("geometry::9Point", NS),
            Err(TypeParseError::InvalidIdentifier { segment, .. }) if segment == "9Point"
        ));
        assert!(matches!(
            parse_type("type", NS),
            Err(TypeParseError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            parse_type("crate", NS),
            Err(TypeParseError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("scale_by"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("2d"));
        assert!(!is_identifier("fn"));
        assert!(!is_identifier("self"));
        assert!(!is_identifier("naïve"));
    }
}
