//! Reusable collection pool.
//!
//! Surrogates that need scratch sets borrow them here and hand them back from
//! their teardown, so eviction releases them at a known point.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

/// Pool of cleared `HashSet`s.
#[derive(Debug)]
pub struct SetPool<T> {
    free: Mutex<Vec<HashSet<T>>>,
    max_retained: usize,
}

impl<T: Eq + Hash> SetPool<T> {
    pub fn new(max_retained: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
        }
    }

    /// Takes an empty set, reusing a returned one when available.
    pub fn acquire(&self) -> HashSet<T> {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    /// Returns a set to the pool. It is cleared before reuse.
    pub fn release(&self, mut set: HashSet<T>) {
        set.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_retained {
            free.push(set);
        } else {
            trace!("🧺 Set pool full, dropping returned set");
        }
    }

    /// Number of sets currently waiting for reuse.
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<T: Eq + Hash> Default for SetPool<T> {
    fn default() -> Self {
        Self::new(64)
    }
}
