//! Asynchronous memoizing wrapper with call coalescing
//!
//! This module provides the async variant of the memoizing wrapper. A miss
//! registers the operation's future in the store before any suspension
//! point, so concurrent calls with the same key await one shared
//! computation and the operation runs at most once per key while a call is
//! in flight. It shares configuration, event, and metrics types with the
//! synchronous implementation; the teardown timer runs as a tokio task
//! instead of a lazy deadline check.

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use regex::Regex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::{MemoConfig, StorageStrategy};
use crate::error::{ConfigError, ConfigResult};
use crate::event::{EventHook, MemoEvent};
use crate::stats::{MemoStats, MetricsCollector};
use crate::store::{BoundedRecencyStore, CacheStore, WeakIdentityStore};

/// Future shared by every caller awaiting the same key
type SharedOutcome<V, E> = Shared<BoxFuture<'static, Result<V, Arc<E>>>>;

/// Boxed asynchronous operation wrapped by the cache
type BoxAsyncOp<A, V, E> = Box<dyn Fn(A) -> BoxFuture<'static, Result<V, E>> + Send + Sync>;

/// Boxed resolver mapping call arguments to a cache key
type BoxResolver<A, K> = Box<dyn Fn(&A) -> K + Send + Sync>;

/// Async memoized wrapper over a bounded least-recently-used store
pub type BoundedAsyncMemoized<A, K, V, E> =
    AsyncMemoized<A, K, V, E, BoundedRecencyStore<K, CachedFuture<V, E>>>;

/// Async memoized wrapper over an object-identity-keyed store
pub type WeakAsyncMemoized<A, T, V, E> =
    AsyncMemoized<A, Arc<T>, V, E, WeakIdentityStore<T, CachedFuture<V, E>>>;

/// Entry stored for a key: a shared in-flight or settled future
///
/// The registration id distinguishes this entry from any later entry stored
/// under the same key, so a failure only removes its own registration.
pub struct CachedFuture<V, E> {
    id: u64,
    outcome: SharedOutcome<V, E>,
}

impl<V, E> Clone for CachedFuture<V, E> {
    fn clone(&self) -> Self {
        Self { id: self.id, outcome: self.outcome.clone() }
    }
}

impl<V: Clone, E> CachedFuture<V, E> {
    /// Whether the underlying computation has settled
    fn is_settled(&self) -> bool {
        self.outcome.peek().is_some()
    }
}

/// Store, activity timestamp, and sweeper flag, guarded as one unit
struct AsyncStoreState<S> {
    store: S,
    last_touch: Instant,
    sweeper_running: bool,
}

/// Memoizing wrapper around an asynchronous operation
///
/// A hit returns the stored future, settled or not, without re-invoking the
/// operation; a miss invokes it exactly once and registers its future
/// before any await. If the shared future fails, the entry is removed so
/// the next call retries, and the same error reaches every coalesced
/// waiter as an [`Arc<E>`]. On success the settled future stays cached.
///
/// The operation factory runs while the internal state lock is held, since
/// lookup and registration are one atomic step. Its synchronous body must
/// not call back into this wrapper; the future it returns runs after the
/// lock is released and may re-enter freely.
///
/// # Type Parameters
///
/// * `A` - Call argument type
/// * `K` - Cache key type produced by the resolver
/// * `V` - Value type (must be `Clone`)
/// * `E` - Error type of the wrapped operation
/// * `S` - Storage strategy
///
/// # Examples
///
/// ```
/// use memocache::{BoundedAsyncMemoized, MemoConfig};
///
/// #[tokio::main]
/// async fn main() -> memocache::ConfigResult<()> {
///     let lookups = BoundedAsyncMemoized::new(
///         |id: u32| async move { Ok::<_, String>(format!("user-{}", id)) },
///         |id| *id,
///         MemoConfig::bounded(100),
///     )?;
///
///     assert_eq!(lookups.call(7).await, Ok("user-7".to_string()));
///     assert_eq!(lookups.call(7).await, Ok("user-7".to_string())); // Cached
///     Ok(())
/// }
/// ```
pub struct AsyncMemoized<A, K, V, E, S>
where
    S: CacheStore<K, CachedFuture<V, E>>,
{
    op: BoxAsyncOp<A, V, E>,
    resolver: BoxResolver<A, K>,
    state: Arc<Mutex<AsyncStoreState<S>>>,
    config: MemoConfig,
    metrics: MetricsCollector,
    hook: Option<EventHook>,
    next_id: AtomicU64,
}

impl<A, K, V, E> AsyncMemoized<A, K, V, E, BoundedRecencyStore<K, CachedFuture<V, E>>>
where
    K: Hash + Eq + Clone + Display + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Wrap an asynchronous operation with a bounded least-recently-used
    /// store
    pub fn new<F, Fut, R>(op: F, resolver: R, config: MemoConfig) -> ConfigResult<Self>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
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
        Ok(Self::from_parts(
            Box::new(move |args| op(args).boxed()),
            Box::new(resolver),
            store,
            config,
        ))
    }
}

impl<A, T, V, E> AsyncMemoized<A, Arc<T>, V, E, WeakIdentityStore<T, CachedFuture<V, E>>>
where
    T: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Wrap an asynchronous operation with an object-identity-keyed store
    pub fn new<F, Fut, R>(op: F, resolver: R, config: MemoConfig) -> ConfigResult<Self>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
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
        Ok(Self::from_parts(
            Box::new(move |args| op(args).boxed()),
            Box::new(resolver),
            store,
            config,
        ))
    }
}

impl<A, K, V, E, S> AsyncMemoized<A, K, V, E, S>
where
    K: Clone + Send + 'static,
    V: Clone + Send + 'static,
    E: Send + Sync + 'static,
    S: CacheStore<K, CachedFuture<V, E>> + Send + 'static,
{
    fn from_parts(
        op: BoxAsyncOp<A, V, E>,
        resolver: BoxResolver<A, K>,
        store: S,
        config: MemoConfig,
    ) -> Self {
        Self {
            op,
            resolver,
            state: Arc::new(Mutex::new(AsyncStoreState {
                store,
                last_touch: Instant::now(),
                sweeper_running: false,
            })),
            config,
            metrics: MetricsCollector::new(),
            hook: None,
            next_id: AtomicU64::new(0),
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
    /// Resolves the key, then either awaits the stored shared future or
    /// invokes the wrapped operation exactly once, registering its future
    /// before the first await. Errors are removed from the store before
    /// they reach any waiter, so the next call with the same key retries.
    pub async fn call(&self, args: A) -> Result<V, Arc<E>> {
        // The resolver runs before any cache interaction; a panicking
        // resolver aborts the call with the store untouched.
        let key = (self.resolver)(&args);

        let mut events = Vec::new();
        let outcome = {
            let mut state = self.state.lock();
            self.reset_teardown(&mut state);

            if let Some(entry) = state.store.get(&key) {
                if self.config.track_metrics {
                    self.metrics.record_hit();
                    if !entry.is_settled() {
                        self.metrics.record_coalesced();
                    }
                }
                if self.hook.is_some() {
                    events.push(MemoEvent::Hit { key: state.store.key_string(&key) });
                }
                entry.outcome
            } else {
                if self.config.track_metrics {
                    self.metrics.record_miss();
                }
                let detail = state.store.key_string(&key);
                if self.hook.is_some() {
                    events.push(MemoEvent::MissStart { key: detail.clone() });
                }

                // Register before any await so concurrent callers coalesce.
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let outcome = self.guarded((self.op)(args), key.clone(), id);
                let evicted = state.store.insert(key, CachedFuture { id, outcome: outcome.clone() });
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
                outcome
            }
        };
        self.emit(&events);

        outcome.await
    }

    /// Drop every entry, replacing the store with a fresh one of the same
    /// strategy
    ///
    /// Futures still in flight are abandoned: whichever way they settle,
    /// the replaced store is no longer consulted.
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

    /// Current number of cached entries, settled and in flight
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

    /// Wrap the operation's future so a failure removes its own
    /// registration before the error reaches any waiter.
    fn guarded(
        &self,
        inner: BoxFuture<'static, Result<V, E>>,
        key: K,
        id: u64,
    ) -> SharedOutcome<V, E> {
        let state = Arc::downgrade(&self.state);
        async move {
            match inner.await {
                Ok(value) => Ok(value),
                Err(error) => {
                    // Only this registration is removed; a later entry
                    // stored under the same key stays put.
                    if let Some(shared_state) = state.upgrade() {
                        let mut state = shared_state.lock();
                        if state.store.peek(&key).is_some_and(|entry| entry.id == id) {
                            state.store.remove(&key);
                        }
                    }
                    Err(Arc::new(error))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Mark this call as the latest activity and make sure a sweeper task
    /// is armed when a teardown duration is configured.
    fn reset_teardown(&self, state: &mut AsyncStoreState<S>) {
        state.last_touch = Instant::now();
        let Some(after) = self.config.teardown_after else {
            return;
        };
        if state.sweeper_running {
            return;
        }
        state.sweeper_running = true;

        let shared = Arc::downgrade(&self.state);
        let metrics = self.metrics.clone();
        let track_metrics = self.config.track_metrics;
        tokio::spawn(async move {
            loop {
                let deadline = {
                    let Some(shared_state) = shared.upgrade() else { return };
                    let state = shared_state.lock();
                    state.last_touch + after
                };
                tokio::time::sleep_until(deadline).await;

                let Some(shared_state) = shared.upgrade() else { return };
                let mut state = shared_state.lock();
                if Instant::now() >= state.last_touch + after {
                    let removed = state.store.len();
                    state.store = state.store.recreate();
                    state.sweeper_running = false;
                    if track_metrics {
                        metrics.record_flush();
                    }
                    debug!(removed, "memoized store flushed after quiet period");
                    return;
                }
                // A call arrived during the sleep; re-arm for its deadline.
            }
        });
    }

    fn emit(&self, events: &[MemoEvent]) {
        if let Some(hook) = &self.hook {
            for event in events {
                hook(event);
            }
        }
    }
}
