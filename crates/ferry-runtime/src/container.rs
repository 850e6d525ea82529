//! Growable sequences addressed by handle.
//!
//! A container is a boxed `Vec<T>` owned by its registry entry. The box never
//! moves, so the handle keeps denoting the same sequence across appends even
//! when the vector reallocates its buffer. Contents are not locked: callers
//! serialize access to a single handle themselves.

use crate::handle::Handle;
use crate::marshal;
use crate::registry::Registry;
use std::fmt::Debug;

/// Allocates an empty sequence and returns its handle (refcount 1).
pub fn new<T: 'static>(registry: &Registry) -> Handle {
    from_vec::<T>(registry, Vec::new())
}

/// Takes ownership of `items` as a new container.
pub fn from_vec<T: 'static>(registry: &Registry, items: Vec<T>) -> Handle {
    Handle::from_raw(marshal::export_owned(registry, items))
}

/// Drops one reference; the last one frees the sequence.
pub fn destroy(registry: &Registry, handle: Handle) -> u32 {
    registry.release(handle)
}

unsafe fn resolve<'a, T>(registry: &Registry, handle: Handle) -> &'a mut Vec<T> {
    &mut *registry.lookup(handle).as_ptr::<Vec<T>>()
}

/// Debug rendering of the current contents.
///
/// # Safety
///
/// `handle` must be a live container of `T`. This holds for every function in
/// this module.
pub unsafe fn describe<T: Debug>(registry: &Registry, handle: Handle) -> String {
    format!("{:?}", resolve::<T>(registry, handle))
}

/// # Safety
///
/// See [`describe`]. Panics when `index` is out of range.
pub unsafe fn item<T: Clone>(registry: &Registry, handle: Handle, index: usize) -> T {
    resolve::<T>(registry, handle)[index].clone()
}

/// # Safety
///
/// See [`describe`]. Panics when `index` is out of range.
pub unsafe fn item_set<T>(registry: &Registry, handle: Handle, index: usize, value: T) {
    resolve::<T>(registry, handle)[index] = value;
}

/// # Safety
///
/// See [`describe`].
pub unsafe fn item_append<T>(registry: &Registry, handle: Handle, value: T) {
    resolve::<T>(registry, handle).push(value);
}
