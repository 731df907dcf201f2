//! Bounded window of applied message ids.

use std::collections::{HashSet, VecDeque};

/// Default number of message ids retained.
pub const DEFAULT_SEEN_CAPACITY: usize = 1_024;

/// FIFO window of applied message ids with O(1) membership checks.
///
/// When the window is full the oldest id is evicted. An id outside the
/// window can in principle be applied again; the window is sized so that
/// realistic relay retries always land inside it.
pub struct SeenMessageCache {
    order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl Default for SeenMessageCache {
    fn default() -> Self {
        Self::new(DEFAULT_SEEN_CAPACITY)
    }
}

impl SeenMessageCache {
    /// Window holding at most `capacity` ids. A zero capacity is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Whether the id is inside the window.
    pub fn contains(&self, message_id: &str) -> bool {
        self.seen.contains(message_id)
    }

    /// Record an applied id, evicting the oldest if the window is full.
    ///
    /// Returns false if the id was already present.
    pub fn record(&mut self, message_id: &str) -> bool {
        if !self.seen.insert(message_id.to_string()) {
            return false;
        }
        self.order.push_back(message_id.to_string());

        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }

    /// Number of ids currently retained.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
