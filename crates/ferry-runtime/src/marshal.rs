//! Conversions between native values and boundary representations.
//!
//! Generated wrappers call these instead of touching the registry directly.
//! Every value that crosses the boundary by reference is represented by the
//! raw id of a registry [`Handle`]; `0` stands for a null pointer.

use crate::fault::{fault, RegistryFault};
use crate::handle::{Handle, Identity};
use crate::registry::{Finalizer, Registry};
use std::ffi::CString;
use std::os::raw::c_char;

/// Moves `value` to the heap and registers it as an owned entry.
///
/// The value is dropped when the returned handle's last reference is
/// released.
pub fn export_owned<T: 'static>(registry: &Registry, value: T) -> i64 {
    if std::mem::size_of::<T>() == 0 {
        // Every zero-sized box shares one dangling address; pad to get a
        // distinct allocation per value.
        let ptr = Box::into_raw(Box::new(ZeroSized { value, _token: 0 }));
        return registry
            .acquire_owned(Identity::from_ptr(ptr), Finalizer::boxed::<ZeroSized<T>>())
            .raw();
    }
    let ptr = Box::into_raw(Box::new(value));
    registry
        .acquire_owned(Identity::from_ptr(ptr), Finalizer::boxed::<T>())
        .raw()
}

/// Heap slot for a zero-sized value. `value` sits at offset 0, so the slot's
/// address is also a valid `*mut T`.
#[repr(C)]
struct ZeroSized<T> {
    value: T,
    _token: u8,
}

/// Registers a borrowed pointer. The registry never frees it.
///
/// Takes `*const T` so results declared either way coerce into it.
pub fn export_ptr<T>(registry: &Registry, ptr: *const T) -> i64 {
    if ptr.is_null() {
        return Handle::NULL.raw();
    }
    registry.acquire(Identity::from_ptr(ptr)).raw()
}

/// Resolves a boundary handle back to the pointer it tracks.
pub fn import_ptr<T>(registry: &Registry, raw: i64) -> *mut T {
    let handle = Handle::from_raw(raw);
    if handle.is_null() {
        return std::ptr::null_mut();
    }
    registry.lookup(handle).as_ptr::<T>()
}

/// Resolves a handle and clones the value behind it.
///
/// # Safety
///
/// `raw` must be a live handle whose identity is the address of a valid `T`.
/// Handle `0` has no value behind it and is a fatal fault.
pub unsafe fn import_clone<T: Clone>(registry: &Registry, raw: i64) -> T {
    let handle = Handle::from_raw(raw);
    if handle.is_null() {
        fault(RegistryFault::DeadHandle(handle));
    }
    (*registry.lookup(handle).as_ptr::<T>()).clone()
}

/// Hands `text` to foreign code as a NUL-terminated string.
///
/// Interior NULs are dropped. The caller frees the result with
/// [`free_text`].
pub fn export_text(text: String) -> *mut c_char {
    let cstring = match CString::new(text) {
        Ok(cstring) => cstring,
        Err(err) => {
            let mut bytes = err.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    };
    cstring.into_raw()
}

/// Frees a string returned by [`export_text`]. Null is ignored.
///
/// # Safety
///
/// `text` must be null or come from [`export_text`] and not have been freed.
pub unsafe fn free_text(text: *mut c_char) {
    if !text.is_null() {
        drop(CString::from_raw(text));
    }
}
