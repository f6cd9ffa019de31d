//! Capacity-capped storage with least-recently-used eviction
//!
//! Wraps the `lru` crate, which keeps true recency order: both hits and
//! inserts promote an entry, so eviction always removes the
//! least-recently-accessed key rather than the oldest insertion.

use std::fmt::Display;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;
use regex::Regex;

use super::CacheStore;

/// Fixed-capacity store evicting least-recently-used entries
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use memocache::{BoundedRecencyStore, CacheStore};
///
/// let mut store = BoundedRecencyStore::new(NonZeroUsize::new(2).expect("capacity must be > 0"));
/// store.insert("key1", "value1");
/// store.insert("key2", "value2");
///
/// assert_eq!(store.get(&"key1"), Some("value1"));
///
/// store.insert("key3", "value3"); // Evicts key2
/// assert_eq!(store.get(&"key2"), None);
/// ```
#[derive(Debug)]
pub struct BoundedRecencyStore<K, V>
where
    K: Hash + Eq,
{
    entries: LruCache<K, V>,
}

impl<K: Hash + Eq, V> BoundedRecencyStore<K, V> {
    /// Create a new store with the specified non-zero capacity
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { entries: LruCache::new(capacity) }
    }

    /// Try to create a new store with the specified capacity
    ///
    /// Returns None if capacity is zero
    pub fn try_new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self { entries: LruCache::new(capacity) })
    }

    /// Get the capacity of the store
    pub fn cap(&self) -> usize {
        self.entries.cap().get()
    }
}

impl<K, V> CacheStore<K, V> for BoundedRecencyStore<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    fn get(&mut self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn peek(&self, key: &K) -> Option<V> {
        self.entries.peek(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) -> Option<K> {
        // Replacing an existing key promotes it but never evicts.
        if self.entries.contains(&key) {
            self.entries.put(key, value);
            return None;
        }
        self.entries.push(key, value).map(|(evicted, _)| evicted)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn max_entries(&self) -> Option<usize> {
        Some(self.cap())
    }

    fn key_strings(&self) -> Option<Vec<String>> {
        Some(self.entries.iter().map(|(key, _)| key.to_string()).collect())
    }

    fn key_string(&self, key: &K) -> Option<String> {
        Some(key.to_string())
    }

    fn remove_matching(&mut self, pattern: &Regex) -> usize {
        // Collect keys to remove (avoid borrow conflict)
        let matching: Vec<K> = self
            .entries
            .iter()
            .filter(|(key, _)| pattern.is_match(&key.to_string()))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matching {
            self.entries.pop(key);
        }
        matching.len()
    }

    fn recreate(&self) -> Self {
        Self { entries: LruCache::new(self.entries.cap()) }
    }
}
