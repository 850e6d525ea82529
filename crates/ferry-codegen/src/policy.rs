//! Boundary representation of each type shape.
//!
//! Policy is decided here as plain data; `synth` and `containers` only render
//! what these values say.

use ferry_types::{PrimitiveKind, TypeDescriptor};
use serde::{Serialize, Serializer};
use std::fmt;

/// The only kinds of value that appear in a boundary signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// A primitive passed by value.
    Scalar(PrimitiveKind),
    /// An `i64` registry handle id; `0` stands for null.
    Handle,
    /// An owned NUL-terminated string, freed through the unit's text-free
    /// entry point.
    Text,
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryType::Scalar(kind) => write!(f, "{}", kind),
            BoundaryType::Handle => f.write_str("handle"),
            BoundaryType::Text => f.write_str("text"),
        }
    }
}

impl Serialize for BoundaryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How a value entering the boundary is turned back into its native form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamPolicy {
    /// Passed through unchanged.
    Scalar(PrimitiveKind),
    /// The handle resolves to the tracked address, reinterpreted as `*mut T`.
    Pointer(TypeDescriptor),
    /// The handle resolves to a value which is cloned for the call.
    Clone(TypeDescriptor),
}

/// How a native value leaving the boundary is represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPolicy {
    /// Returned unchanged.
    Scalar(PrimitiveKind),
    /// The pointer is registered without ownership.
    Pointer(TypeDescriptor),
    /// The value is boxed and owned by its registry entry.
    Owned,
}

impl ParamPolicy {
    pub fn for_type(ty: &TypeDescriptor) -> Result<Self, &'static str> {
        check_shape(ty)?;
        Ok(match ty {
            TypeDescriptor::Primitive(kind) => ParamPolicy::Scalar(*kind),
            TypeDescriptor::Pointer(inner) => ParamPolicy::Pointer((**inner).clone()),
            TypeDescriptor::Named(_) | TypeDescriptor::Array(_) => ParamPolicy::Clone(ty.clone()),
        })
    }

    pub fn boundary(&self) -> BoundaryType {
        match self {
            ParamPolicy::Scalar(kind) => BoundaryType::Scalar(*kind),
            ParamPolicy::Pointer(_) | ParamPolicy::Clone(_) => BoundaryType::Handle,
        }
    }
}

impl ResultPolicy {
    pub fn for_type(ty: &TypeDescriptor) -> Result<Self, &'static str> {
        check_shape(ty)?;
        Ok(match ty {
            TypeDescriptor::Primitive(kind) => ResultPolicy::Scalar(*kind),
            TypeDescriptor::Pointer(inner) => ResultPolicy::Pointer((**inner).clone()),
            TypeDescriptor::Named(_) | TypeDescriptor::Array(_) => ResultPolicy::Owned,
        })
    }

    pub fn boundary(&self) -> BoundaryType {
        match self {
            ResultPolicy::Scalar(kind) => BoundaryType::Scalar(*kind),
            ResultPolicy::Pointer(_) | ResultPolicy::Owned => BoundaryType::Handle,
        }
    }
}

/// Rejects shapes with no sound boundary representation anywhere inside `ty`.
pub fn check_shape(ty: &TypeDescriptor) -> Result<(), &'static str> {
    for node in ty.walk() {
        if let TypeDescriptor::Pointer(inner) = node {
            match **inner {
                TypeDescriptor::Pointer(_) => {
                    return Err("a pointer to a pointer has no single tracked identity")
                }
                TypeDescriptor::Array(_) => {
                    return Err("containers cross the boundary by handle; use Vec<T> instead of a pointer to one")
                }
                TypeDescriptor::Primitive(_) | TypeDescriptor::Named(_) => {}
            }
        }
    }
    Ok(())
}
