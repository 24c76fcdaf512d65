// ABOUTME: Bounded least-recently-used cache for highlighted texts, keyed by exact input.
// ABOUTME: Thread-safe behind a Mutex; entries are never mutated after insertion.

//! Result memoization for the highlighter.
//!
//! Highlighting the same article twice is common (a page is reloaded, two
//! listeners request it). The cache keeps the last few results keyed by the
//! exact input text. It is a pure optimization: hits return exactly what a
//! fresh computation would.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A size-capped LRU map from input text to highlighted text.
#[derive(Debug)]
pub struct HighlightCache {
    capacity: usize,
    // Least recently used at the front.
    entries: Mutex<VecDeque<(String, String)>>,
}

impl HighlightCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Returns the cached value for `key`, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let pos = entries.iter().position(|(k, _)| k == key)?;
        let entry = entries.remove(pos)?;
        let value = entry.1.clone();
        entries.push_back(entry);
        Some(value)
    }

    /// Stores `value` for `key`, evicting the least recently used entry when full.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        let key = key.into();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = entries.iter().position(|(k, _)| *k == key) {
            entries.remove(pos);
        }
        entries.push_back((key, value.into()));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
