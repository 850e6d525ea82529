use std::fmt;

/// Boundary-visible identifier standing in for a tracked native value.
///
/// Live handles are always negative: the registry hands out `-1`, `-2`, `-3`,
/// … in strict sequence. [`Handle::NULL`] is never assigned and stands for a
/// null pointer at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(i64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    pub const fn from_raw(raw: i64) -> Self {
        Handle(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a native value: its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    pub const fn from_addr(addr: usize) -> Self {
        Identity(addr)
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Identity(ptr as usize)
    }

    pub const fn addr(self) -> usize {
        self.0
    }

    /// Reinterprets the identity as a pointer to `T`.
    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
