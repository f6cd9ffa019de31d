//! Time source abstraction for testability.
//!
//! The synchronous wrapper measures its teardown quiet period through a
//! [`Clock`] so debounce behavior can be tested deterministically without
//! actual delays. Production code uses [`SystemClock`]; tests inject a
//! [`MockClock`] and advance it manually.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Trait for time operations to enable deterministic testing
pub trait Clock: Send + Sync + 'static {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Mock clock for deterministic testing
///
/// Allows tests to control time progression without actual delays. Clones
/// share the elapsed counter, so a test can keep a handle while the wrapper
/// owns another.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock starting at the current instant
    pub fn new() -> Self {
        Self { start: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Advance the mock clock by milliseconds (convenience method)
    ///
    /// Equivalent to `advance(Duration::from_millis(millis))`.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Get the current elapsed time
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for clock.
    use super::*;

    /// Validates `MockClock::advance` behavior for the mock clock progression
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `clock.now().duration_since(start)` equals
    ///   `Duration::from_millis(150)`.
    /// - Confirms `clock.elapsed()` equals `Duration::from_millis(150)`.
    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(100));
        clock.advance_millis(50);

        assert_eq!(clock.now().duration_since(start), Duration::from_millis(150));
        assert_eq!(clock.elapsed(), Duration::from_millis(150));
    }

    /// Validates `MockClock::clone` behavior for the shared elapsed counter
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `handle.elapsed()` equals `Duration::from_millis(30)`.
    #[test]
    fn test_mock_clock_clone_shares_time() {
        let clock = MockClock::new();
        let handle = clock.clone();

        clock.advance_millis(30);

        assert_eq!(handle.elapsed(), Duration::from_millis(30));
    }

    /// Validates `SystemClock::now` behavior for the monotonic time scenario.
    ///
    /// Assertions:
    /// - Ensures `second >= first` evaluates to true.
    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
