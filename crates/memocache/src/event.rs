//! Observability events emitted by the wrappers.
//!
//! An optional hook receives one event per cache transition: a miss about to
//! run the wrapped operation, a hit, a store, a capacity eviction, or a
//! manual invalidation. Hooks are invoked outside the store lock, after the
//! transition completed, so a hook may safely call back into the wrapper.

use std::sync::Arc;

/// Cache lifecycle event delivered to the observability hook
///
/// Key-bearing variants carry the key's string form when the backing store
/// can render one; weak-identity stores cannot (identity keys have no string
/// form) and report `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoEvent {
    /// A lookup missed and the wrapped operation is about to run
    MissStart {
        /// String form of the missed key, when available
        key: Option<String>,
    },
    /// A lookup was served from the cache
    Hit {
        /// String form of the hit key, when available
        key: Option<String>,
    },
    /// A value or in-flight future was stored
    Store {
        /// String form of the stored key, when available
        key: Option<String>,
    },
    /// A capacity eviction removed an entry to make room
    Evict {
        /// String form of the evicted key, when available
        key: Option<String>,
    },
    /// A manual invalidation removed entries
    Invalidate {
        /// Number of entries removed
        removed: usize,
    },
}

impl MemoEvent {
    /// Stable event name for logging and external dispatch
    pub fn name(&self) -> &'static str {
        match self {
            MemoEvent::MissStart { .. } => "miss-start",
            MemoEvent::Hit { .. } => "hit",
            MemoEvent::Store { .. } => "store",
            MemoEvent::Evict { .. } => "evict",
            MemoEvent::Invalidate { .. } => "invalidate",
        }
    }

    /// Key detail carried by the event, when the store rendered one
    pub fn key(&self) -> Option<&str> {
        match self {
            MemoEvent::MissStart { key }
            | MemoEvent::Hit { key }
            | MemoEvent::Store { key }
            | MemoEvent::Evict { key } => key.as_deref(),
            MemoEvent::Invalidate { .. } => None,
        }
    }
}

/// Shared observability callback attached via `with_event_hook`
pub type EventHook = Arc<dyn Fn(&MemoEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    //! Unit tests for event.
    use super::*;

    /// Validates `MemoEvent::name` behavior for the event name mapping
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms each variant maps to its stable wire name.
    #[test]
    fn test_event_names() {
        assert_eq!(MemoEvent::MissStart { key: None }.name(), "miss-start");
        assert_eq!(MemoEvent::Hit { key: None }.name(), "hit");
        assert_eq!(MemoEvent::Store { key: None }.name(), "store");
        assert_eq!(MemoEvent::Evict { key: None }.name(), "evict");
        assert_eq!(MemoEvent::Invalidate { removed: 3 }.name(), "invalidate");
    }

    /// Validates `MemoEvent::key` behavior for the key detail scenario.
    ///
    /// Assertions:
    /// - Confirms `hit.key()` equals `Some("42")`.
    /// - Ensures `MemoEvent::Invalidate { removed: 1 }.key().is_none()`
    ///   evaluates to true.
    #[test]
    fn test_event_key_detail() {
        let hit = MemoEvent::Hit { key: Some("42".to_string()) };
        assert_eq!(hit.key(), Some("42"));
        assert!(MemoEvent::Invalidate { removed: 1 }.key().is_none());
    }
}
