use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kinds that cross the boundary by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 13] = [
        PrimitiveKind::Bool,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::Isize,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::Usize,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    /// The Rust spelling of this kind, also used as its canonical name.
    pub fn rust_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Isize => "isize",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PrimitiveKind::ALL.into_iter().find(|kind| kind.rust_name() == name)
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

/// A composite type named by its module path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedType {
    /// Module path the type lives in, e.g. `crate::geometry`. May be empty.
    pub namespace: String,
    pub name: String,
}

impl NamedType {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        NamedType {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Path segments of the namespace followed by the type name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .split("::")
            .filter(|segment| !segment.is_empty())
            .chain(std::iter::once(self.name.as_str()))
    }

    /// Fully qualified Rust path, e.g. `crate::geometry::Point`.
    pub fn path(&self) -> String {
        self.segments().collect::<Vec<_>>().join("::")
    }
}

/// Closed classification of every type shape that may appear in an exported
/// signature.
///
/// Descriptors compare structurally: two descriptors for the same element type
/// are equal and hash alike, which is what lets the container generator emit a
/// single bundle per element type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Pointer(Box<TypeDescriptor>),
    Named(NamedType),
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn pointer(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(inner))
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDescriptor::Named(NamedType::new(namespace, name))
    }

    /// The element type if this is an array descriptor.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Normalized, identifier-safe rendering used to name generated symbols.
    ///
    /// Primitives render as their Rust spelling, named types as their path
    /// segments joined by `__` (a leading `crate` segment is dropped), pointers
    /// as `ptr_<inner>` and arrays as `slice_of_<element>`.
    pub fn canonical_name(&self) -> String {
        match self {
            TypeDescriptor::Primitive(kind) => kind.rust_name().to_string(),
            TypeDescriptor::Pointer(inner) => format!("ptr_{}", inner.canonical_name()),
            TypeDescriptor::Named(named) => named
                .segments()
                .skip_while(|segment| *segment == "crate")
                .collect::<Vec<_>>()
                .join("__"),
            TypeDescriptor::Array(element) => format!("slice_of_{}", element.canonical_name()),
        }
    }

    /// Pre-order traversal over this descriptor and every nested descriptor.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{}", kind),
            TypeDescriptor::Pointer(inner) => write!(f, "*mut {}", inner),
            TypeDescriptor::Named(named) => f.write_str(&named.path()),
            TypeDescriptor::Array(element) => write!(f, "Vec<{}>", element),
        }
    }
}

/// Iterator returned by [`TypeDescriptor::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a TypeDescriptor>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        match current {
            TypeDescriptor::Pointer(inner) | TypeDescriptor::Array(inner) => self.stack.push(inner),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Named(_) => {}
        }
        Some(current)
    }
}
