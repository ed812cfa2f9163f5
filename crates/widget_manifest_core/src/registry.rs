//! Ownership table for values exposed across the C boundary.
//!
//! # Responsibility
//! - Own every exposed value from registration until its explicit release.
//! - Resolve caller-supplied handles by address identity only.
//!
//! # Invariants
//! - A handle is readable iff it is present in the table.
//! - Releasing an unknown handle fails without touching the table.
//! - Entries are never mutated after registration; only inserted or removed.
//! - All table access goes through one lock; entries are dropped outside it.

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Opaque handle: the address of the view a caller was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle {
    pub fn from_address(address: usize) -> Self {
        Self(address)
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    pub fn address(self) -> usize {
        self.0
    }
}

/// A value whose caller-visible view lives at a fixed heap address.
///
/// The address must not change when the value itself is moved, so
/// implementors point it into storage they own behind a `Box` or another
/// heap allocation.
pub trait Exposed: Send {
    fn exposed_address(&self) -> usize;
}

/// Process- or test-scoped ownership table keyed by exposed address.
#[derive(Debug)]
pub struct LifetimeRegistry<T> {
    entries: Mutex<HashMap<Handle, T>>,
}

impl<T> Default for LifetimeRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Exposed> LifetimeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `entry` and returns the handle callers will hold.
    pub fn register(&self, entry: T) -> Handle {
        let handle = Handle::from_address(entry.exposed_address());
        let displaced = self.lock().insert(handle, entry);
        debug_assert!(displaced.is_none(), "live exposed addresses are unique");
        debug!("event=handle_register module=registry status=ok");
        handle
    }

    /// Removes and frees the entry behind `handle`.
    pub fn release(&self, handle: Handle) -> bool {
        self.release_if(handle, |_| true)
    }

    /// Removes and frees the entry behind `handle` when `accept` allows it.
    ///
    /// Returns `false` without mutation when the handle is unknown or the
    /// entry is rejected.
    pub fn release_if(&self, handle: Handle, accept: impl FnOnce(&T) -> bool) -> bool {
        let removed = {
            let mut entries = self.lock();
            if entries.get(&handle).is_some_and(accept) {
                entries.remove(&handle)
            } else {
                None
            }
        };

        match removed {
            Some(entry) => {
                drop(entry);
                debug!("event=handle_release module=registry status=ok");
                true
            }
            None => {
                warn!(
                    "event=handle_release module=registry status=error error_code=unknown_handle"
                );
                false
            }
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.lock().contains_key(&handle)
    }

    /// Runs `read` against a live entry while the table lock is held.
    #[cfg(test)]
    pub fn with_entry<R>(&self, handle: Handle, read: impl FnOnce(&T) -> R) -> Option<R> {
        self.lock().get(&handle).map(read)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Frees every entry and returns how many were released.
    pub fn drain(&self) -> usize {
        let drained: Vec<T> = self.lock().drain().map(|(_, entry)| entry).collect();
        let count = drained.len();
        drop(drained);
        debug!("event=registry_drain module=registry status=ok released={count}");
        count
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Handle, T>> {
        self.entries.lock().unwrap_or_else(|err| err.into_inner())
    }
}
