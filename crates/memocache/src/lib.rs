//! Memoizing wrappers for expensive operations
//!
//! This crate provides transparent caching wrappers around synchronous and
//! asynchronous operations. A wrapper pairs an operation with a
//! caller-supplied key resolver and a storage strategy; repeated calls with
//! the same key are served from the store instead of re-running the
//! operation.
//!
//! # Features
//!
//! - **Transparent**: the wrapped operation keeps its call signature; the
//!   resolver derives the cache key from the call arguments
//! - **Coalescing**: concurrent async calls with the same key await one
//!   shared future, so the operation runs at most once per key in flight
//! - **Error transparent**: failures propagate unmodified and are never
//!   cached; the next call with the same key retries
//! - **Idle teardown**: an optional quiet period after which the whole
//!   store is discarded
//! - **Observable**: lifecycle event hooks and optional hit/miss statistics
//! - **Testable**: clock abstraction for deterministic time-based testing
//!
//! # Examples
//!
//! ## Bounded Memoization
//! ```
//! use memocache::{BoundedMemoized, MemoConfig};
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let lookups = BoundedMemoized::new(
//!     |id: u32| Ok::<_, String>(format!("user-{}", id)),
//!     |id| *id,
//!     MemoConfig::bounded(100),
//! )?;
//!
//! assert_eq!(lookups.call(7), Ok("user-7".to_string()));
//! assert_eq!(lookups.call(7), Ok("user-7".to_string())); // Cached
//! # Ok(())
//! # }
//! ```
//!
//! ## Async Memoization with Call Coalescing
//! ```
//! use memocache::{BoundedAsyncMemoized, MemoConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> memocache::ConfigResult<()> {
//! let sessions = BoundedAsyncMemoized::new(
//!     |id: u64| async move { Ok::<_, String>(format!("session-{}", id)) },
//!     |id| *id,
//!     MemoConfig::bounded(100),
//! )?;
//!
//! let (first, second) = tokio::join!(sessions.call(1), sessions.call(1));
//! assert_eq!(first, Ok("session-1".to_string()));
//! assert_eq!(second, Ok("session-1".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Weak Identity Keys
//! ```
//! use std::sync::Arc;
//!
//! use memocache::{MemoConfig, WeakMemoized};
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let sizes = WeakMemoized::new(
//!     |doc: Arc<String>| Ok::<_, String>(doc.len()),
//!     Arc::clone,
//!     MemoConfig::weak_identity(),
//! )?;
//!
//! let doc = Arc::new("payload".to_string());
//! assert_eq!(sizes.call(Arc::clone(&doc)), Ok(7));
//! assert_eq!(sizes.call(Arc::clone(&doc)), Ok(7)); // Same object, cached
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Configuration with Builder
//! ```
//! use std::time::Duration;
//!
//! use memocache::{BoundedMemoized, MemoConfig};
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let config = MemoConfig::builder()
//!     .max_entries(500)
//!     .teardown_after(Duration::from_secs(300))
//!     .track_metrics(true)
//!     .build()?;
//!
//! let reports = BoundedMemoized::new(
//!     |quarter: String| Ok::<_, String>(quarter.len()),
//!     |quarter| quarter.clone(),
//!     config,
//! )?;
//! # let _ = reports.call("q1".to_string());
//! # Ok(())
//! # }
//! ```
//!
//! ## Pattern Invalidation
//! ```
//! use memocache::{BoundedMemoized, MemoConfig};
//! use regex::Regex;
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let perms = BoundedMemoized::new(
//!     |key: String| Ok::<_, String>(key.len()),
//!     |key| key.clone(),
//!     MemoConfig::bounded(100),
//! )?;
//!
//! let _ = perms.call("user-1".to_string());
//! let _ = perms.call("role-1".to_string());
//!
//! let pattern = Regex::new("^user-").unwrap();
//! assert_eq!(perms.invalidate_matching(&pattern), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cache Statistics
//! ```
//! use memocache::{BoundedMemoized, MemoConfig};
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let config = MemoConfig::builder().max_entries(100).track_metrics(true).build()?;
//!
//! let lookups = BoundedMemoized::new(|id: u32| Ok::<_, String>(id * 2), |id| *id, config)?;
//!
//! let _ = lookups.call(1);
//! let _ = lookups.call(1);
//!
//! let stats = lookups.stats();
//! println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
//! println!("Cache size: {}/{:?}", stats.size, stats.max_entries);
//! # Ok(())
//! # }
//! ```
//!
//! # Storage Strategies
//!
//! - **Bounded recency** ([`BoundedRecencyStore`]): capacity-limited
//!   (default 100 entries), evicting the least recently used entry when
//!   full; keys are enumerable, so pattern invalidation is selective
//! - **Weak identity** ([`WeakIdentityStore`]): keyed by object identity of
//!   `Arc` keys; an entry is reclaimed once its key object is dropped, keys
//!   cannot be enumerated, and pattern invalidation degrades to a full
//!   clear
//!
//! # Thread Safety
//!
//! Wrappers are thread-safe and can be shared across threads using `Arc`:
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use memocache::{BoundedMemoized, MemoConfig};
//!
//! # fn main() -> memocache::ConfigResult<()> {
//! let lookups = Arc::new(BoundedMemoized::new(
//!     |id: u32| Ok::<_, String>(id * 2),
//!     |id| *id,
//!     MemoConfig::bounded(100),
//! )?);
//!
//! let mut handles = vec![];
//! for i in 0..10 {
//!     let lookups_clone = Arc::clone(&lookups);
//!     let handle = thread::spawn(move || {
//!         let _ = lookups_clone.call(i);
//!     });
//!     handles.push(handle);
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

mod async_core;
mod clock;
mod config;
mod core;
mod error;
mod event;
mod stats;
mod store;

// Re-export public API
pub use core::{BoundedMemoized, Memoized, WeakMemoized};

pub use async_core::{AsyncMemoized, BoundedAsyncMemoized, CachedFuture, WeakAsyncMemoized};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{MemoConfig, MemoConfigBuilder, StorageStrategy, DEFAULT_MAX_ENTRIES};
pub use error::{ConfigError, ConfigResult};
pub use event::{EventHook, MemoEvent};
pub use stats::MemoStats;
pub use store::{BoundedRecencyStore, CacheStore, WeakIdentityStore};
