//! Indexed min-heap of pending requests.
//!
//! Each key appears at most once. Priorities can be changed or the entry
//! removed in `O(log n)` through a key → slot index. Equal priorities pop
//! in insertion order.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Copy, Debug)]
struct Entry<K> {
    key: K,
    priority: i64,
    sequence: u64,
}

impl<K> Entry<K> {
    #[inline]
    fn rank(&self) -> (i64, u64) {
        (self.priority, self.sequence)
    }
}

/// Min-heap keyed by `K` with updatable priorities.
#[derive(Debug)]
pub struct PriorityQueue<K> {
    heap: Vec<Entry<K>>,
    slots: HashMap<K, usize>,
    next_sequence: u64,
}

impl<K: Copy + Eq + Hash> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PriorityQueue<K> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
            next_sequence: 0,
        }
    }

    /// Number of queued keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is queued.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns true if `key` is queued.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Current priority of `key`.
    #[must_use]
    pub fn priority(&self, key: &K) -> Option<i64> {
        self.slots.get(key).map(|&slot| self.heap[slot].priority)
    }

    /// Inserts `key`, or changes its priority if already queued.
    ///
    /// Returns true if the key was newly inserted.
    pub fn push(&mut self, key: K, priority: i64) -> bool {
        if let Some(&slot) = self.slots.get(&key) {
            self.heap[slot].priority = priority;
            self.restore(slot);
            return false;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry { key, priority, sequence });
        let slot = self.heap.len() - 1;
        self.slots.insert(key, slot);
        self.sift_up(slot);
        true
    }

    /// The lowest-priority key without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(K, i64)> {
        self.heap.first().map(|e| (e.key, e.priority))
    }

    /// Removes and returns the lowest-priority key.
    pub fn pop(&mut self) -> Option<(K, i64)> {
        self.take(0).map(|e| (e.key, e.priority))
    }

    /// Removes `key`, returning its priority.
    pub fn remove(&mut self, key: &K) -> Option<i64> {
        let slot = *self.slots.get(key)?;
        self.take(slot).map(|e| e.priority)
    }

    /// Recomputes every priority; keys mapped to `None` are dropped.
    ///
    /// Returns the number of dropped keys.
    pub fn reprioritize(&mut self, mut priority: impl FnMut(&K) -> Option<i64>) -> usize {
        let before = self.heap.len();
        self.heap.retain_mut(|entry| match priority(&entry.key) {
            Some(p) => {
                entry.priority = p;
                true
            }
            None => false,
        });

        self.slots.clear();
        for (slot, entry) in self.heap.iter().enumerate() {
            self.slots.insert(entry.key, slot);
        }
        for slot in (0..self.heap.len() / 2).rev() {
            self.sift_down(slot);
        }
        before - self.heap.len()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    fn take(&mut self, slot: usize) -> Option<Entry<K>> {
        if slot >= self.heap.len() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(slot, last);
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.key);
        if slot < self.heap.len() {
            self.restore(slot);
        }
        Some(entry)
    }

    fn restore(&mut self, slot: usize) {
        if slot > 0 && self.heap[slot].rank() < self.heap[(slot - 1) / 2].rank() {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].rank() >= self.heap[parent].rank() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < self.heap.len() && self.heap[left].rank() < self.heap[smallest].rank() {
                smallest = left;
            }
            if right < self.heap.len() && self.heap[right].rank() < self.heap[smallest].rank() {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].key, a);
        self.slots.insert(self.heap[b].key, b);
    }
}
