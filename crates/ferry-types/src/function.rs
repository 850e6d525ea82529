use crate::descriptor::TypeDescriptor;

/// A named parameter of an exported function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// Signature of one native function exported by a package.
///
/// Built once while the package inventory is read and consumed exactly once
/// by the binding synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportedFunction {
    /// Module path holding the function, e.g. `crate::geometry`.
    pub namespace: String,
    pub name: String,
    pub params: Vec<Param>,
    /// Result types in declaration order. Several results mean the native
    /// function returns a tuple.
    pub results: Vec<TypeDescriptor>,
}

impl ExportedFunction {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ExportedFunction {
            namespace: namespace.into(),
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_result(mut self, ty: TypeDescriptor) -> Self {
        self.results.push(ty);
        self
    }

    /// Path segments of the namespace followed by the function name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .split("::")
            .filter(|segment| !segment.is_empty())
            .chain(std::iter::once(self.name.as_str()))
    }

    /// Callable Rust path of the native function.
    pub fn path(&self) -> String {
        self.segments().collect::<Vec<_>>().join("::")
    }

    /// Every descriptor mentioned by the signature, parameters first.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.params.iter().map(|param| &param.ty).chain(self.results.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_builder_and_path() {
        let point = TypeDescriptor::named("crate::geometry", "Point");
        let func = ExportedFunction::new("crate::geometry", "scale")
            .with_param("p", point.clone())
            .with_param("k", TypeDescriptor::Primitive(PrimitiveKind::F64))
            .with_result(point.clone());

        assert_eq!(func.path(), "crate::geometry::scale");
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.types().count(), 3);
        assert_eq!(func.types().last(), Some(&point));
    }

    #[test]
    fn test_path_without_namespace() {
        assert_eq!(ExportedFunction::new("", "tick").path(), "tick");
    }
}
