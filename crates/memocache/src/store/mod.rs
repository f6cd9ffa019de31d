//! Storage strategies for memoized entries
//!
//! This module defines the [`CacheStore`] trait the wrapper is generic over,
//! together with its two concrete strategies: a capacity-capped store with
//! least-recently-used eviction and an object-identity-keyed store whose
//! entries are reclaimed automatically when their keys are dropped. The
//! strategy is selected once at construction; the wrapper never branches on
//! it afterwards.

use regex::Regex;

mod bounded;
mod weak;

pub use bounded::BoundedRecencyStore;
pub use weak::WeakIdentityStore;

/// Backing storage for memoized entries
///
/// Implementations hold at most one entry per key. Lookups return owned
/// clones so the store lock never outlives a call into user code.
pub trait CacheStore<K, V> {
    /// Check whether an entry exists for the key without touching recency
    fn contains(&self, key: &K) -> bool;

    /// Look up the entry for a key, promoting it to most-recently-used where
    /// the strategy tracks recency
    fn get(&mut self, key: &K) -> Option<V>;

    /// Look up the entry for a key without updating recency
    fn peek(&self, key: &K) -> Option<V>;

    /// Insert or replace the entry for a key
    ///
    /// Returns the key of the entry evicted to make room, if any. Replacing
    /// an existing key never evicts.
    fn insert(&mut self, key: K, value: V) -> Option<K>;

    /// Remove the entry for a key, returning its value
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove every entry
    fn clear(&mut self);

    /// Current number of live entries
    fn len(&self) -> usize;

    /// Check if the store holds no live entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity limit, if the strategy has one
    fn max_entries(&self) -> Option<usize>;

    /// String forms of all keys, most-recently-used first
    ///
    /// Returns `None` for strategies whose keys cannot be enumerated.
    fn key_strings(&self) -> Option<Vec<String>>;

    /// String form of a single key, if the strategy can render one
    fn key_string(&self, key: &K) -> Option<String>;

    /// Remove entries whose key's string form matches the pattern
    ///
    /// Strategies without enumerable keys clear everything instead,
    /// regardless of the pattern. Returns the number of entries removed.
    fn remove_matching(&mut self, pattern: &Regex) -> usize;

    /// Create a fresh, empty store with the same configuration
    fn recreate(&self) -> Self
    where
        Self: Sized;
}
