//! Fixed-capacity history buffers
//!
//! Used for body trails, walker footprints and the phasor wave trace.
//! Newest entry first; the oldest entry is evicted when full.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> Trail<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a new entry at the front, dropping the oldest on overflow
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.items.push_front(item);
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    /// Change the capacity, discarding the oldest entries if it shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.items.truncate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Most recent entry
    pub fn newest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Entry that will be evicted next
    pub fn oldest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
