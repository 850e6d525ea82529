use crate::handle::{Handle, Identity};
use thiserror::Error;

/// Registry consistency faults.
///
/// Each one means the registry or its caller has a bug; continuing would let
/// the two registry indices drift apart, so they are raised through [`fault`]
/// and never returned as values.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFault {
    #[error("registry used before initialize()")]
    Uninitialized,

    #[error("release of untracked handle {0}")]
    UntrackedHandle(Handle),

    #[error("release of untracked object at {0}")]
    UntrackedIdentity(Identity),

    #[error("handle {0} is not live")]
    DeadHandle(Handle),

    #[error("handle id space exhausted")]
    IdSpaceExhausted,

    #[error("handle ids must start below zero, got {0}")]
    InvalidStart(i64),

    #[error("object at {0} is already owned by the registry")]
    AlreadyOwned(Identity),

    #[error("reference count overflow on handle {0}")]
    RefcountOverflow(Handle),

    #[error("registry indices diverged at handle {0}")]
    CorruptIndex(Handle),
}

/// Reports a fatal registry fault and panics.
///
/// Inside an `extern "C"` boundary function the panic cannot unwind and the
/// process aborts.
#[cold]
#[track_caller]
pub fn fault(fault: RegistryFault) -> ! {
    log::error!("fatal registry fault: {}", fault);
    panic!("fatal registry fault: {}", fault)
}
