//! LRU Cache Module
//!
//! Least Recently Used cache built from a hash index over an arena-backed
//! doubly linked list.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::debug;

use super::{Cache, CacheStats};
use crate::error::{CacheError, Result};

// == Node ==
/// A list node; `prev` points toward the head, `next` toward the tail.
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU State ==
/// Everything guarded by the cache lock.
///
/// - `head` = most recently used
/// - `tail` = least recently used
///
/// Slots freed by delete or eviction are recycled through `free`.
#[derive(Debug)]
struct LruState<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LruState<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            stats: CacheStats::new(),
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Places a detached node in a free slot and returns its handle.
    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(node) = self.slots[idx].as_mut() {
            node.next = next;
        }
    }

    // == Unshift ==
    /// Links a detached node in at the head.
    fn unshift(&mut self, idx: usize) {
        let old_head = self.head;
        self.set_prev(idx, None);
        self.set_next(idx, old_head);

        match old_head {
            Some(head) => self.set_prev(head, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    // == Pull ==
    /// Unlinks a node from the list, leaving it allocated.
    fn pull(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }

        self.set_prev(idx, None);
        self.set_next(idx, None);
    }

    /// Unlinks a node and returns its slot to the free list.
    fn release(&mut self, idx: usize) -> Option<Node<K, V>> {
        self.pull(idx);
        let node = self.slots[idx].take();
        if node.is_some() {
            self.free.push(idx);
        }
        node
    }

    /// Moves an existing node to the head.
    fn touch(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.pull(idx);
            self.unshift(idx);
        }
    }

    // == Pop ==
    /// Evicts the tail node and drops it from the index.
    fn pop(&mut self) -> Option<K> {
        let tail = self.tail?;
        let node = self.release(tail)?;
        self.index.remove(&node.key);
        self.stats.record_eviction();
        Some(node.key)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used.
    fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.slots[idx].as_ref() {
                Some(node) => {
                    keys.push(node.key.clone());
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }
}

// == LRU Cache ==
/// Thread-safe cache evicting the least recently used entry once more than
/// `capacity` keys are stored.
///
/// Both `set` and `get` count as a use.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    state: Mutex<LruState<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is accepted as-is: every insert is evicted at once.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState::new()),
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the live keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().keys()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.len())
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send,
    V: Clone + Send,
{
    fn set(&self, key: K, value: V) -> Result<()> {
        let mut state = self.state.lock();

        if let Some(idx) = state.index.get(&key).copied() {
            if let Some(node) = state.slots[idx].as_mut() {
                node.value = value;
            }
            state.touch(idx);
            return Ok(());
        }

        let idx = state.alloc(key.clone(), value);
        state.unshift(idx);
        state.index.insert(key, idx);

        if state.len() > self.capacity {
            if let Some(evicted) = state.pop() {
                debug!(key = ?evicted, "evicted least recently used entry");
            }
        }

        Ok(())
    }

    fn get(&self, key: &K) -> Result<V> {
        let mut state = self.state.lock();

        let Some(idx) = state.index.get(key).copied() else {
            state.stats.record_lookup(false);
            return Err(CacheError::not_found(key));
        };

        state.touch(idx);
        state.stats.record_lookup(true);
        state.slots[idx]
            .as_ref()
            .map(|node| node.value.clone())
            .ok_or_else(|| CacheError::not_found(key))
    }

    fn delete(&self, key: &K) -> Result<()> {
        let mut state = self.state.lock();

        match state.index.remove(key) {
            Some(idx) => {
                state.release(idx);
                Ok(())
            }
            None => Err(CacheError::not_found(key)),
        }
    }

    fn clear(&self) -> Result<()> {
        self.state.lock().clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    impl<K: Eq + Hash + Clone + Debug, V> LruState<K, V> {
        /// Walks the list both ways and cross-checks it against the index.
        fn assert_consistent(&self) {
            let forward = self.keys();
            assert_eq!(forward.len(), self.index.len(), "list length != index size");

            let mut backward = Vec::new();
            let mut cursor = self.tail;
            while let Some(idx) = cursor {
                let node = self.slots[idx].as_ref().expect("dangling tail link");
                backward.push(node.key.clone());
                cursor = node.prev;
            }
            backward.reverse();
            assert_eq!(forward, backward, "prev and next links disagree");

            for (key, &idx) in &self.index {
                let node = self.slots[idx].as_ref().expect("index points at free slot");
                assert_eq!(&node.key, key);
            }

            let occupied = self.slots.iter().filter(|s| s.is_some()).count();
            assert_eq!(occupied, self.index.len());
            assert_eq!(occupied + self.free.len(), self.slots.len());

            if self.index.is_empty() {
                assert!(self.head.is_none() && self.tail.is_none());
            }
        }
    }

    fn assert_consistent<K: Eq + Hash + Clone + Debug, V>(cache: &LruCache<K, V>) {
        cache.state.lock().assert_consistent();
    }

    #[test]
    fn test_lru_new() {
        let cache: LruCache<i32, String> = LruCache::new(3);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_set_and_get() {
        let cache = LruCache::new(3);
        for (key, value) in ["zero", "one", "two"].into_iter().enumerate() {
            cache.set(key, value.to_string()).unwrap();
        }

        assert_eq!(cache.get(&0).unwrap(), "zero");
        assert_eq!(cache.get(&1).unwrap(), "one");
        assert_eq!(cache.get(&2).unwrap(), "two");
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_evicts_tail() {
        let cache = LruCache::new(3);
        cache.set(0, "zero").unwrap();
        cache.set(1, "one").unwrap();
        cache.set(2, "two").unwrap();
        cache.set(3, "three").unwrap();

        assert!(matches!(cache.get(&0), Err(CacheError::NotFound(_))));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys(), vec![3, 2, 1]);
        assert_eq!(cache.stats().evictions, 1);
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let cache = LruCache::new(3);
        cache.set("k1", 1).unwrap();
        cache.set("k2", 2).unwrap();
        cache.set("k3", 3).unwrap();

        cache.get(&"k1").unwrap();
        cache.set("k4", 4).unwrap();

        assert!(cache.get(&"k1").is_ok());
        assert!(matches!(cache.get(&"k2"), Err(CacheError::NotFound(_))));
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_overwrite_moves_to_head() {
        let cache = LruCache::new(3);
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        cache.set("c", 3).unwrap();

        cache.set("a", 10).unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys(), vec!["a", "c", "b"]);
        assert_eq!(cache.get(&"a").unwrap(), 10);

        // 'b' is now the tail
        cache.set("d", 4).unwrap();
        assert!(cache.get(&"b").is_err());
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_delete_head_middle_tail() {
        let cache = LruCache::new(5);
        for key in ["a", "b", "c", "d", "e"] {
            cache.set(key, key.len()).unwrap();
        }
        // order: e d c b a

        cache.delete(&"e").unwrap();
        assert_consistent(&cache);
        cache.delete(&"c").unwrap();
        assert_consistent(&cache);
        cache.delete(&"a").unwrap();
        assert_consistent(&cache);

        assert_eq!(cache.keys(), vec!["d", "b"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_delete_nonexistent() {
        let cache = LruCache::new(2);
        cache.set(1, "one").unwrap();

        let err = cache.delete(&7).unwrap_err();
        assert_eq!(err.to_string(), "key 7 not found");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_get_nonexistent() {
        let cache: LruCache<i32, &str> = LruCache::new(2);

        let err = cache.get(&4).unwrap_err();
        assert_eq!(err.to_string(), "key 4 not found");
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_lru_capacity_one() {
        let cache = LruCache::new(1);
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();

        assert_eq!(cache.keys(), vec!["b"]);
        assert!(cache.get(&"a").is_err());
        assert_consistent(&cache);

        cache.delete(&"b").unwrap();
        assert!(cache.is_empty());
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_capacity_zero_holds_nothing() {
        let cache = LruCache::new(0);
        cache.set("a", 1).unwrap();

        assert!(cache.is_empty());
        assert!(cache.get(&"a").is_err());
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_clear() {
        let cache = LruCache::new(3);
        cache.set(1, "one").unwrap();
        cache.set(2, "two").unwrap();

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(cache.get(&1).is_err());
        assert_consistent(&cache);

        for key in 0..3 {
            cache.set(key, "again").unwrap();
        }
        assert_eq!(cache.len(), 3);
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_reuses_freed_slots() {
        let cache = LruCache::new(2);
        for key in 0..100 {
            cache.set(key, key).unwrap();
        }

        assert_eq!(cache.state.lock().slots.len(), 3);
        assert_eq!(cache.keys(), vec![99, 98]);
        assert_consistent(&cache);
    }

    #[test]
    fn test_lru_concurrent_distinct_sets() {
        let capacity = 16;
        let cache = Arc::new(LruCache::<i32, i32>::new(capacity));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.set(worker * 1000 + i, i).unwrap();
                        let _ = cache.get(&(worker * 1000 + i / 2));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), capacity);
        let keys: HashSet<_> = cache.keys().into_iter().collect();
        assert_eq!(keys.len(), capacity);
        assert_consistent(&cache);
    }
}
