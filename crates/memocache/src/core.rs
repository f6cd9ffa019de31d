//! Synchronous memoizing wrapper
//!
//! This module wraps a fallible synchronous operation with a caching layer
//! providing at-most-one-execution-per-key. The storage strategy is chosen
//! once at construction: [`BoundedMemoized`] caches by key value with
//! least-recently-used eviction, [`WeakMemoized`] caches by key object
//! identity with automatic reclamation. Errors from the wrapped operation
//! propagate unmodified and are never cached, so the next call with the
//! same key retries.

use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::{MemoConfig, StorageStrategy};
use crate::error::{ConfigError, ConfigResult};
use crate::event::{EventHook, MemoEvent};
use crate::stats::{MemoStats, MetricsCollector};
use crate::store::{BoundedRecencyStore, CacheStore, WeakIdentityStore};

/// Boxed operation wrapped by the cache
type BoxOp<A, V, E> = Box<dyn Fn(A) -> Result<V, E> + Send + Sync>;

/// Boxed resolver mapping call arguments to a cache key
type BoxResolver<A, K> = Box<dyn Fn(&A) -> K + Send + Sync>;

/// Memoized wrapper over a bounded least-recently-used store
pub type BoundedMemoized<A, K, V, E, C = SystemClock> =
    Memoized<A, K, V, E, BoundedRecencyStore<K, V>, C>;

/// Memoized wrapper over an object-identity-keyed store
pub type WeakMemoized<A, T, V, E, C = SystemClock> =
    Memoized<A, Arc<T>, V, E, WeakIdentityStore<T, V>, C>;

/// Store plus the timestamp of the last call, guarded as one unit
struct StoreState<S> {
    store: S,
    last_touch: Option<Instant>,
}

/// Memoizing wrapper around a fallible synchronous operation
///
/// A hit returns the cached value without re-invoking the operation; a miss
/// invokes it exactly once and stores the result. The key is produced by a
/// caller-supplied resolver, which runs before any cache interaction.
///
/// # Type Parameters
/// - `A`: Call argument type
/// - `K`: Cache key type produced by the resolver
/// - `V`: Value type (must be `Clone`)
/// - `E`: Error type of the wrapped operation
/// - `S`: Storage strategy
/// - `C`: Clock type for the teardown timer (defaults to `SystemClock`)
///
/// # Example
/// ```
/// use memocache::{BoundedMemoized, MemoConfig};
///
/// # fn main() -> memocache::ConfigResult<()> {
/// let lookups = BoundedMemoized::new(
///     |id: u32| Ok::<_, String>(format!("user-{}", id)),
///     |id| *id,
///     MemoConfig::bounded(100),
/// )?;
///
/// assert_eq!(lookups.call(7), Ok("user-7".to_string()));
/// assert_eq!(lookups.call(7), Ok("user-7".to_string())); // Served from cache
/// # Ok(())
/// # }
/// ```
pub struct Memoized<A, K, V, E, S, C = SystemClock>
where
    S: CacheStore<K, V>,
    V: Clone,
    C: Clock,
{
    op: BoxOp<A, V, E>,
    resolver: BoxResolver<A, K>,
    state: Mutex<StoreState<S>>,
    config: MemoConfig,
    metrics: MetricsCollector,
    hook: Option<EventHook>,
    clock: C,
}

impl<A, K, V, E> Memoized<A, K, V, E, BoundedRecencyStore<K, V>, SystemClock>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
{
    /// Wrap an operation with a bounded least-recently-used store
    pub fn new<F, R>(op: F, resolver: R, config: MemoConfig) -> ConfigResult<Self>
    where
        F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
        R: Fn(&A) -> K + Send + Sync + 'static,
    {
        Self::with_clock(op, resolver, config, SystemClock)
    }
}

impl<A, K, V, E, C> Memoized<A, K, V, E, BoundedRecencyStore<K, V>, C>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
    C: Clock,
{
    /// Wrap an operation with a bounded store and a custom clock (useful for
    /// testing)
    pub fn with_clock<F, R>(op: F, resolver: R, config: MemoConfig, clock: C) -> ConfigResult<Self>
    where
        F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
        R: Fn(&A) -> K + Send + Sync + 'static,
    {
        config.validate()?;
        if config.strategy != StorageStrategy::Bounded {
            return Err(ConfigError::Invalid {
                message: format!(
                    "bounded wrapper requires StorageStrategy::Bounded, got {:?}",
                    config.strategy
                ),
            });
        }
        let store = BoundedRecencyStore::try_new(config.max_entries).ok_or_else(|| {
            ConfigError::Invalid { message: "max_entries must be greater than zero".to_string() }
        })?;
        Ok(Self::from_parts(Box::new(op), Box::new(resolver), store, config, clock))
    }
}

impl<A, T, V, E> Memoized<A, Arc<T>, V, E, WeakIdentityStore<T, V>, SystemClock>
where
    V: Clone,
{
    /// Wrap an operation with an object-identity-keyed store
    pub fn new<F, R>(op: F, resolver: R, config: MemoConfig) -> ConfigResult<Self>
    where
        F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
        R: Fn(&A) -> Arc<T> + Send + Sync + 'static,
    {
        Self::with_clock(op, resolver, config, SystemClock)
    }
}

impl<A, T, V, E, C> Memoized<A, Arc<T>, V, E, WeakIdentityStore<T, V>, C>
where
    V: Clone,
    C: Clock,
{
    /// Wrap an operation with an object-identity-keyed store and a custom
    /// clock (useful for testing)
    pub fn with_clock<F, R>(op: F, resolver: R, config: MemoConfig, clock: C) -> ConfigResult<Self>
    where
        F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
        R: Fn(&A) -> Arc<T> + Send + Sync + 'static,
    {
        config.validate()?;
        if config.strategy != StorageStrategy::WeakIdentity {
            return Err(ConfigError::Invalid {
                message: format!(
                    "weak-identity wrapper requires StorageStrategy::WeakIdentity, got {:?}",
                    config.strategy
                ),
            });
        }
        let store = WeakIdentityStore::new();
        Ok(Self::from_parts(Box::new(op), Box::new(resolver), store, config, clock))
    }
}

impl<A, K, V, E, S, C> Memoized<A, K, V, E, S, C>
where
    S: CacheStore<K, V>,
    V: Clone,
    C: Clock,
{
    fn from_parts(
        op: BoxOp<A, V, E>,
        resolver: BoxResolver<A, K>,
        store: S,
        config: MemoConfig,
        clock: C,
    ) -> Self {
        Self {
            op,
            resolver,
            state: Mutex::new(StoreState { store, last_touch: None }),
            config,
            metrics: MetricsCollector::new(),
            hook: None,
            clock,
        }
    }

    /// Attach an observer for cache lifecycle events
    ///
    /// The hook runs after the store lock is released, so it may call back
    /// into the wrapper.
    pub fn with_event_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&MemoEvent) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Call through the cache
    ///
    /// Resolves the key, then either returns the cached value or invokes the
    /// wrapped operation exactly once and stores its result. Errors are
    /// never cached. Concurrent callers missing on the same key each invoke
    /// the operation; the last result stored wins.
    pub fn call(&self, args: A) -> Result<V, E> {
        // The resolver runs before any cache interaction; a panicking
        // resolver aborts the call with the store untouched.
        let key = (self.resolver)(&args);

        let mut events = Vec::new();
        let cached = {
            let mut state = self.state.lock();
            self.reset_teardown(&mut state);

            let value = state.store.get(&key);
            match &value {
                Some(_) => {
                    if self.config.track_metrics {
                        self.metrics.record_hit();
                    }
                    if self.hook.is_some() {
                        events.push(MemoEvent::Hit { key: state.store.key_string(&key) });
                    }
                }
                None => {
                    if self.config.track_metrics {
                        self.metrics.record_miss();
                    }
                    if self.hook.is_some() {
                        events.push(MemoEvent::MissStart { key: state.store.key_string(&key) });
                    }
                }
            }
            value
        };
        self.emit(&events);

        if let Some(value) = cached {
            return Ok(value);
        }
        events.clear();

        // The operation runs outside the lock; errors propagate uncached.
        let value = (self.op)(args)?;

        {
            let mut state = self.state.lock();
            let detail = state.store.key_string(&key);
            let evicted = state.store.insert(key, value.clone());
            if self.config.track_metrics {
                self.metrics.record_insert();
                if evicted.is_some() {
                    self.metrics.record_eviction();
                }
            }
            if self.hook.is_some() {
                events.push(MemoEvent::Store { key: detail });
                if let Some(evicted) = &evicted {
                    events.push(MemoEvent::Evict { key: state.store.key_string(evicted) });
                }
            }
        }
        self.emit(&events);

        Ok(value)
    }

    /// Drop every entry, replacing the store with a fresh one of the same
    /// strategy
    pub fn invalidate_all(&self) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            let removed = state.store.len();
            state.store = state.store.recreate();
            if self.config.track_metrics {
                self.metrics.record_invalidation();
            }
            if self.hook.is_some() {
                events.push(MemoEvent::Invalidate { removed });
            }
            debug!(removed, "memoized store invalidated");
        }
        self.emit(&events);
    }

    /// Remove entries whose key's string form matches the pattern
    ///
    /// Stores without enumerable keys clear everything instead, regardless
    /// of the pattern. Returns the number of entries removed.
    pub fn invalidate_matching(&self, pattern: &Regex) -> usize {
        let mut events = Vec::new();
        let removed = {
            let mut state = self.state.lock();
            let removed = state.store.remove_matching(pattern);
            if self.config.track_metrics {
                self.metrics.record_invalidation();
            }
            if self.hook.is_some() {
                events.push(MemoEvent::Invalidate { removed });
            }
            debug!(pattern = %pattern, removed, "memoized entries invalidated by pattern");
            removed
        };
        self.emit(&events);
        removed
    }

    /// Get current statistics
    pub fn stats(&self) -> MemoStats {
        let state = self.state.lock();
        self.metrics.snapshot(state.store.len(), state.store.max_entries())
    }

    /// Reset all statistics counters to zero
    ///
    /// Cached entries are unaffected; `size` and `max_entries` stay live.
    pub fn reset_stats(&self) {
        self.metrics.reset();
    }

    /// Current number of cached entries
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// String forms of all cached keys, most-recently-used first
    ///
    /// Returns `None` when the storage strategy cannot enumerate keys.
    pub fn keys(&self) -> Option<Vec<String>> {
        self.state.lock().store.key_strings()
    }

    /// Flush the store if the quiet period elapsed, then mark this call as
    /// the latest activity.
    fn reset_teardown(&self, state: &mut StoreState<S>) {
        let now = self.clock.now();
        if let Some(after) = self.config.teardown_after {
            if let Some(last) = state.last_touch {
                if now.duration_since(last) >= after {
                    let removed = state.store.len();
                    state.store = state.store.recreate();
                    if self.config.track_metrics {
                        self.metrics.record_flush();
                    }
                    debug!(removed, "memoized store flushed after quiet period");
                }
            }
        }
        state.last_touch = Some(now);
    }

    fn emit(&self, events: &[MemoEvent]) {
        if let Some(hook) = &self.hook {
            for event in events {
                hook(event);
            }
        }
    }
}
