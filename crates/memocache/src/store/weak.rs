//! Object-identity-keyed storage with automatic reclamation
//!
//! Keys are `Arc` handles compared by allocation address rather than value
//! equality. The store holds only [`Weak`] references to its keys, so an
//! entry stays alive exactly as long as some caller still holds the key;
//! entries whose keys were dropped are pruned opportunistically on later
//! inserts and `get` probes, and read-only probes skip dead slots. Keys
//! are not enumerable, so pattern invalidation degrades to a full clear.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use regex::Regex;

use super::CacheStore;

/// Return the allocation address identifying a key object.
///
/// A held `Weak` pins its allocation, so a map hit at a live probe's address
/// always refers to the probing object itself.
fn addr<T>(key: &Arc<T>) -> usize {
    Arc::as_ptr(key) as usize
}

/// Object-identity-keyed store with automatic, non-deterministic reclamation
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use memocache::{CacheStore, WeakIdentityStore};
///
/// let mut store = WeakIdentityStore::new();
/// let key = Arc::new("session-42".to_string());
///
/// store.insert(Arc::clone(&key), 7_u32);
/// assert_eq!(store.get(&key), Some(7));
///
/// drop(key); // The entry dies with its last outside handle
/// assert_eq!(store.len(), 0);
/// ```
#[derive(Debug)]
pub struct WeakIdentityStore<T, V> {
    entries: HashMap<usize, (Weak<T>, V)>,
}

impl<T, V> WeakIdentityStore<T, V> {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Number of entries whose key object is still held somewhere
    fn live_len(&self) -> usize {
        self.entries.values().filter(|(weak, _)| weak.strong_count() > 0).count()
    }

    /// Drop entries whose key object is no longer held anywhere
    fn prune(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
    }
}

impl<T, V> Default for WeakIdentityStore<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V: Clone> CacheStore<Arc<T>, V> for WeakIdentityStore<T, V> {
    fn contains(&self, key: &Arc<T>) -> bool {
        self.entries.get(&addr(key)).is_some_and(|(weak, _)| weak.strong_count() > 0)
    }

    fn get(&mut self, key: &Arc<T>) -> Option<V> {
        // No recency to track; the exclusive probe doubles as the
        // reclamation point for entries whose key object was dropped.
        self.prune();
        self.entries.get(&addr(key)).map(|(_, value)| value.clone())
    }

    fn peek(&self, key: &Arc<T>) -> Option<V> {
        self.entries
            .get(&addr(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, value)| value.clone())
    }

    fn insert(&mut self, key: Arc<T>, value: V) -> Option<Arc<T>> {
        self.prune();
        self.entries.insert(addr(&key), (Arc::downgrade(&key), value));
        None
    }

    fn remove(&mut self, key: &Arc<T>) -> Option<V> {
        self.entries.remove(&addr(key)).map(|(_, value)| value)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.live_len()
    }

    fn max_entries(&self) -> Option<usize> {
        None
    }

    fn key_strings(&self) -> Option<Vec<String>> {
        None
    }

    fn key_string(&self, _key: &Arc<T>) -> Option<String> {
        None
    }

    fn remove_matching(&mut self, _pattern: &Regex) -> usize {
        // Keys cannot be enumerated, so any pattern clears everything.
        let removed = self.live_len();
        self.entries.clear();
        removed
    }

    fn recreate(&self) -> Self {
        Self::new()
    }
}
