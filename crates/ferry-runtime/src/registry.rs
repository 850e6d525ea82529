use crate::fault::{fault, RegistryFault};
use crate::handle::{Handle, Identity};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Reclaims a value owned by a registry entry once its last reference is
/// released.
#[derive(Clone, Copy)]
pub struct Finalizer {
    reclaim: unsafe fn(Identity),
}

impl Finalizer {
    /// Finalizer for a value created with `Box::into_raw(Box::<T>::new(..))`.
    pub fn boxed<T>() -> Self {
        Finalizer {
            reclaim: drop_boxed::<T>,
        }
    }
}

impl std::fmt::Debug for Finalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Finalizer")
    }
}

unsafe fn drop_boxed<T>(identity: Identity) {
    drop(Box::from_raw(identity.as_ptr::<T>()));
}

#[derive(Debug)]
struct Entry {
    identity: Identity,
    refcount: u32,
    finalizer: Option<Finalizer>,
}

/// Both indices plus the id generator. Only ever touched with the lock held.
#[derive(Debug)]
struct RegistryState {
    next: i64,
    handles: FxHashMap<Identity, Handle>,
    entries: FxHashMap<Handle, Entry>,
}

impl RegistryState {
    fn new(first: i64) -> Self {
        RegistryState {
            next: first,
            handles: FxHashMap::default(),
            entries: FxHashMap::default(),
        }
    }

    fn allocate(&mut self) -> Handle {
        let handle = Handle::from_raw(self.next);
        if handle.raw() >= 0 {
            fault(RegistryFault::IdSpaceExhausted);
        }
        // Fails closed before i64::MIN is handed out.
        self.next = match self.next.checked_sub(1) {
            Some(next) => next,
            None => fault(RegistryFault::IdSpaceExhausted),
        };
        handle
    }
}

enum Key {
    Handle(Handle),
    Identity(Identity),
}

/// Point-in-time copy of the registry's indices, for tests and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    /// The id the next new entry will receive.
    pub next: i64,
    /// Handle -> (identity, refcount).
    pub entries: BTreeMap<Handle, (Identity, u32)>,
    /// Identity -> handle.
    pub handles: BTreeMap<Identity, Handle>,
}

/// Process-wide table of live handles and their reference counts.
///
/// The registry is an ordinary value so tests can build isolated instances;
/// generated units hold exactly one in a `static`. A single mutex serializes
/// every operation, and each critical section is a lookup plus at most two
/// map writes.
pub struct Registry {
    first: i64,
    state: Mutex<Option<RegistryState>>,
}

impl Registry {
    /// The first id handed out after `initialize`.
    pub const FIRST_HANDLE: i64 = -1;

    /// An uninitialized registry; call [`Registry::initialize`] before use.
    pub const fn new() -> Self {
        Registry {
            first: Self::FIRST_HANDLE,
            state: parking_lot::const_mutex(None),
        }
    }

    /// A registry that is ready for use.
    pub fn initialized() -> Self {
        let registry = Registry::new();
        registry.initialize();
        registry
    }

    /// An initialized registry whose id generator starts at `first`.
    pub fn starting_at(first: i64) -> Self {
        if first >= 0 {
            fault(RegistryFault::InvalidStart(first));
        }
        let registry = Registry {
            first,
            state: parking_lot::const_mutex(None),
        };
        registry.initialize();
        registry
    }

    /// Recreates both indices empty and resets the id generator.
    ///
    /// Meant to run once at startup, before any boundary call. Entries still
    /// live at that point are forgotten without running their finalizers.
    pub fn initialize(&self) {
        let mut state = self.state.lock();
        if let Some(previous) = state.as_ref() {
            if !previous.entries.is_empty() {
                log::warn!(
                    "Registry re-initialized with {} live handle(s); their values are leaked",
                    previous.entries.len()
                );
            }
        }
        *state = Some(RegistryState::new(self.first));
        log::debug!("Registry initialized (first handle {})", self.first);
    }

    /// Tracks `identity`, or adds a reference if it is already tracked.
    pub fn acquire(&self, identity: Identity) -> Handle {
        self.acquire_entry(identity, None)
    }

    /// Like [`Registry::acquire`], but the entry owns the value: `finalizer`
    /// runs when the last reference is released.
    pub fn acquire_owned(&self, identity: Identity, finalizer: Finalizer) -> Handle {
        self.acquire_entry(identity, Some(finalizer))
    }

    fn acquire_entry(&self, identity: Identity, finalizer: Option<Finalizer>) -> Handle {
        let mut guard = self.state.lock();
        let state = match guard.as_mut() {
            Some(state) => state,
            None => fault(RegistryFault::Uninitialized),
        };

        if let Some(&handle) = state.handles.get(&identity) {
            let entry = match state.entries.get_mut(&handle) {
                Some(entry) => entry,
                None => fault(RegistryFault::CorruptIndex(handle)),
            };
            entry.refcount = match entry.refcount.checked_add(1) {
                Some(count) => count,
                None => fault(RegistryFault::RefcountOverflow(handle)),
            };
            if let Some(finalizer) = finalizer {
                if entry.finalizer.is_some() {
                    fault(RegistryFault::AlreadyOwned(identity));
                }
                entry.finalizer = Some(finalizer);
            }
            log::trace!("acquire {} -> handle {} (refcount {})", identity, handle, entry.refcount);
            return handle;
        }

        let handle = state.allocate();
        state.handles.insert(identity, handle);
        state.entries.insert(
            handle,
            Entry {
                identity,
                refcount: 1,
                finalizer,
            },
        );
        log::trace!("acquire {} -> new handle {}", identity, handle);
        handle
    }

    /// Adds a reference to a live handle and returns it.
    pub fn retain(&self, handle: Handle) -> Handle {
        let mut guard = self.state.lock();
        let state = match guard.as_mut() {
            Some(state) => state,
            None => fault(RegistryFault::Uninitialized),
        };
        let entry = match state.entries.get_mut(&handle) {
            Some(entry) => entry,
            None => fault(RegistryFault::DeadHandle(handle)),
        };
        entry.refcount = match entry.refcount.checked_add(1) {
            Some(count) => count,
            None => fault(RegistryFault::RefcountOverflow(handle)),
        };
        log::trace!("retain handle {} (refcount {})", handle, entry.refcount);
        handle
    }

    /// Drops one reference to `handle` and returns the references left.
    ///
    /// Releasing a handle with no entry is a fatal fault.
    pub fn release(&self, handle: Handle) -> u32 {
        self.release_entry(Key::Handle(handle))
    }

    /// Drops one reference to the entry tracking `identity`.
    pub fn release_identity(&self, identity: Identity) -> u32 {
        self.release_entry(Key::Identity(identity))
    }

    fn release_entry(&self, key: Key) -> u32 {
        let (identity, finalizer) = {
            let mut guard = self.state.lock();
            let state = match guard.as_mut() {
                Some(state) => state,
                None => fault(RegistryFault::Uninitialized),
            };
            let handle = match key {
                Key::Handle(handle) => handle,
                Key::Identity(identity) => match state.handles.get(&identity) {
                    Some(&handle) => handle,
                    None => fault(RegistryFault::UntrackedIdentity(identity)),
                },
            };
            let entry = match state.entries.get_mut(&handle) {
                Some(entry) => entry,
                None => fault(RegistryFault::UntrackedHandle(handle)),
            };
            if state.handles.get(&entry.identity) != Some(&handle) {
                fault(RegistryFault::CorruptIndex(handle));
            }

            if entry.refcount > 1 {
                entry.refcount -= 1;
                log::trace!("release handle {} (refcount {})", handle, entry.refcount);
                return entry.refcount;
            }

            let identity = entry.identity;
            let finalizer = state.entries.remove(&handle).and_then(|entry| entry.finalizer);
            state.handles.remove(&identity);
            log::trace!("release handle {} (entry removed)", handle);
            (identity, finalizer)
        };

        // Runs outside the lock so a finalizer may release other handles.
        if let Some(finalizer) = finalizer {
            unsafe { (finalizer.reclaim)(identity) };
        }
        0
    }

    /// Resolves a live handle to the identity it tracks.
    ///
    /// Looking up a handle that is not live is a fatal fault.
    pub fn lookup(&self, handle: Handle) -> Identity {
        let guard = self.state.lock();
        let state = match guard.as_ref() {
            Some(state) => state,
            None => fault(RegistryFault::Uninitialized),
        };
        match state.entries.get(&handle) {
            Some(entry) => entry.identity,
            None => fault(RegistryFault::DeadHandle(handle)),
        }
    }

    /// Current refcount of `handle`, or `None` if it is not live.
    pub fn refcount(&self, handle: Handle) -> Option<u32> {
        let guard = self.state.lock();
        guard
            .as_ref()
            .and_then(|state| state.entries.get(&handle))
            .map(|entry| entry.refcount)
    }

    /// The handle currently tracking `identity`, if any.
    pub fn handle_of(&self, identity: Identity) -> Option<Handle> {
        let guard = self.state.lock();
        guard
            .as_ref()
            .and_then(|state| state.handles.get(&identity).copied())
    }

    /// Number of live entries.
    pub fn live_count(&self) -> usize {
        let guard = self.state.lock();
        guard.as_ref().map_or(0, |state| state.entries.len())
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let guard = self.state.lock();
        let state = match guard.as_ref() {
            Some(state) => state,
            None => fault(RegistryFault::Uninitialized),
        };
        RegistrySnapshot {
            next: state.next,
            entries: state
                .entries
                .iter()
                .map(|(handle, entry)| (*handle, (entry.identity, entry.refcount)))
                .collect(),
            handles: state
                .handles
                .iter()
                .map(|(identity, handle)| (*identity, *handle))
                .collect(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn id(addr: usize) -> Identity {
        Identity::from_addr(addr)
    }

    #[test]
    fn test_acquire_then_release_restores_state() {
        let registry = Registry::initialized();
        let other = registry.acquire(id(0x10));
        let before = registry.snapshot();

        let handle = registry.acquire(id(0x20));
        assert_ne!(registry.snapshot(), before);
        assert_eq!(registry.release(handle), 0);

        let after = registry.snapshot();
        assert_eq!(after.entries, before.entries);
        assert_eq!(after.handles, before.handles);
        assert_eq!(registry.lookup(other), id(0x10));
    }

    #[test]
    fn test_acquire_twice_shares_handle() {
        let registry = Registry::initialized();
        let first = registry.acquire(id(0x40));
        let second = registry.acquire(id(0x40));
        assert_eq!(first, second);
        assert_eq!(registry.refcount(first), Some(2));

        assert_eq!(registry.release(first), 1);
        assert_eq!(registry.handle_of(id(0x40)), Some(first));
        assert_eq!(registry.release(first), 0);
        assert_eq!(registry.handle_of(id(0x40)), None);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_distinct_identities_get_distinct_handles() {
        let registry = Registry::initialized();
        assert_ne!(registry.acquire(id(1)), registry.acquire(id(2)));
    }

    #[test]
    fn test_ids_are_sequential_across_releases() {
        let registry = Registry::initialized();
        let a = registry.acquire(id(0xa));
        assert_eq!(a.raw(), -1);
        registry.release(a);
        let b = registry.acquire(id(0xb));
        let c = registry.acquire(id(0xa));
        assert_eq!((b.raw(), c.raw()), (-2, -3));
        registry.release(b);
        assert_eq!(registry.acquire(id(0xd)).raw(), -4);
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let registry = Registry::initialized();
        let p = id(0x1000);

        let handle = registry.acquire(p);
        assert_eq!(handle.raw(), -1);
        assert_eq!(registry.refcount(handle), Some(1));

        assert_eq!(registry.acquire(p), handle);
        assert_eq!(registry.refcount(handle), Some(2));

        assert_eq!(registry.release_identity(p), 1);
        assert_eq!(registry.lookup(handle), p);

        assert_eq!(registry.release_identity(p), 0);
        let snapshot = registry.snapshot();
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.handles.is_empty());
    }

    #[test]
    #[should_panic(expected = "release of untracked object")]
    fn test_third_release_is_fatal() {
        let registry = Registry::initialized();
        let p = id(0x1000);
        registry.acquire(p);
        registry.acquire(p);
        registry.release_identity(p);
        registry.release_identity(p);
        registry.release_identity(p);
    }

    #[test]
    #[should_panic(expected = "release of untracked handle -7")]
    fn test_release_unknown_handle_is_fatal() {
        let registry = Registry::initialized();
        registry.release(Handle::from_raw(-7));
    }

    #[test]
    #[should_panic(expected = "handle -1 is not live")]
    fn test_lookup_dead_handle_is_fatal() {
        let registry = Registry::initialized();
        let handle = registry.acquire(id(3));
        registry.release(handle);
        registry.lookup(handle);
    }

    #[test]
    #[should_panic(expected = "registry used before initialize()")]
    fn test_uninitialized_registry_is_fatal() {
        let registry = Registry::new();
        registry.acquire(id(1));
    }

    #[test]
    #[should_panic(expected = "handle id space exhausted")]
    fn test_id_space_exhaustion_fails_closed() {
        let registry = Registry::starting_at(i64::MIN + 1);
        assert_eq!(registry.acquire(id(1)).raw(), i64::MIN + 1);
        registry.acquire(id(2));
    }

    #[test]
    #[should_panic(expected = "handle ids must start below zero")]
    fn test_non_negative_start_is_rejected() {
        Registry::starting_at(0);
    }

    #[test]
    fn test_initialize_resets_generator() {
        let registry = Registry::initialized();
        registry.acquire(id(1));
        registry.acquire(id(2));
        registry.initialize();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.acquire(id(3)).raw(), -1);
    }

    #[test]
    fn test_retain_adds_reference() {
        let registry = Registry::initialized();
        let handle = registry.acquire(id(5));
        assert_eq!(registry.retain(handle), handle);
        assert_eq!(registry.refcount(handle), Some(2));
    }

    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Tracked;

    impl Drop for Tracked {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_finalizer_runs_on_last_release() {
        let registry = Registry::initialized();
        let ptr = Box::into_raw(Box::new(Tracked));
        let handle = registry.acquire_owned(Identity::from_ptr(ptr), Finalizer::boxed::<Tracked>());
        registry.retain(handle);

        registry.release(handle);
        assert_eq!(DROPS.load(Ordering::SeqCst), 0);
        registry.release(handle);
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "already owned by the registry")]
    fn test_second_owner_faults() {
        let registry = Registry::initialized();
        registry.acquire_owned(id(0x40), Finalizer::boxed::<u64>());
        registry.acquire_owned(id(0x40), Finalizer::boxed::<u64>());
    }

    #[test]
    fn test_owned_acquire_adopts_borrowed_entry() {
        let registry = Registry::initialized();
        let ptr = Box::into_raw(Box::new(9_u64));
        let borrowed = registry.acquire(Identity::from_ptr(ptr));
        let owned = registry.acquire_owned(Identity::from_ptr(ptr), Finalizer::boxed::<u64>());
        assert_eq!(borrowed, owned);
        registry.release(owned);
        assert_eq!(registry.release(owned), 0);
        assert_eq!(registry.live_count(), 0);
    }
}
