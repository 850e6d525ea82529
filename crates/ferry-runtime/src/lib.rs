//! Runtime support for ferry-generated boundary code.
//!
//! The centrepiece is the [`Registry`]: a mutex-guarded table mapping the
//! identity (address) of a native value to a small reference-counted
//! [`Handle`], and back. Generated shims hold one registry in a `static` and
//! reach it only through the operations exposed here, so every
//! lifetime-affecting step is serialized by the registry's lock.
//!
//! Registry consistency faults (releasing an untracked value, exhausting the
//! id space, using the registry before `initialize`) are not errors: they
//! panic through [`fault`]. Generated entry points are `extern "C"`, so such a
//! panic aborts the process instead of unwinding into foreign code.
//!
//! Boundary usage faults are left unchecked by the layers above
//! the registry: indexing a container out of range, using a handle after its
//! last release, or passing a handle to a bundle for a different element type
//! are undefined behaviour for callers of generated bindings.

mod fault;
mod handle;
mod registry;

pub mod container;
pub mod marshal;

pub use fault::{fault, RegistryFault};
pub use handle::{Handle, Identity};
pub use registry::{Finalizer, Registry, RegistrySnapshot};
