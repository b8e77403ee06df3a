//! Single-slot, latest-wins mailbox shared between two threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Holds at most one value. A new `put` overwrites anything not yet taken.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value it displaced, if any.
    pub fn put(&self, value: T) -> Option<T> {
        self.lock().replace(value)
    }

    /// Never blocks on an empty slot.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    // The slot is a plain Option; a panic elsewhere cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
