//! Wrapper configuration types and builder patterns
//!
//! This module provides configuration for memoized operations: which storage
//! strategy backs the cache, its capacity, the optional whole-store teardown
//! debounce, and metrics tracking.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Default maximum entry count for the bounded strategy
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Storage strategy backing a memoized operation
///
/// The strategy is selected once at construction; the wrapper never branches
/// on it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageStrategy {
    /// Fixed capacity with least-recently-used eviction; keys are iterable
    /// for pattern invalidation
    #[default]
    Bounded,
    /// Object-identity keys reclaimed automatically once the key object is
    /// released; not iterable, no explicit eviction
    WeakIdentity,
}

/// Configuration for a memoized operation
#[derive(Debug, Clone)]
pub struct MemoConfig {
    /// Storage strategy backing the cache
    pub strategy: StorageStrategy,

    /// Maximum number of entries for the bounded strategy (ignored by
    /// weak-identity)
    pub max_entries: usize,

    /// Whole-store flush after this quiet period (None = never flush)
    pub teardown_after: Option<Duration>,

    /// Whether to collect access metrics
    pub track_metrics: bool,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            strategy: StorageStrategy::Bounded,
            max_entries: DEFAULT_MAX_ENTRIES,
            teardown_after: None,
            track_metrics: false,
        }
    }
}

impl MemoConfig {
    /// Create a new configuration builder
    pub fn builder() -> MemoConfigBuilder {
        MemoConfigBuilder::default()
    }

    /// Quick preset for a bounded cache with the given capacity
    ///
    /// # Example
    /// ```
    /// use memocache::MemoConfig;
    ///
    /// let config = MemoConfig::bounded(1000);
    /// ```
    pub fn bounded(max_entries: usize) -> Self {
        Self { strategy: StorageStrategy::Bounded, max_entries, ..Self::default() }
    }

    /// Quick preset for a weak-identity cache
    ///
    /// # Example
    /// ```
    /// use memocache::MemoConfig;
    ///
    /// let config = MemoConfig::weak_identity();
    /// ```
    pub fn weak_identity() -> Self {
        Self { strategy: StorageStrategy::WeakIdentity, ..Self::default() }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.strategy == StorageStrategy::Bounded && self.max_entries == 0 {
            return Err(ConfigError::Invalid {
                message: "max_entries must be greater than 0 for the bounded strategy".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for MemoConfig with fluent API
#[derive(Debug, Default)]
pub struct MemoConfigBuilder {
    config: MemoConfig,
}

impl MemoConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage strategy
    pub fn strategy(mut self, strategy: StorageStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the maximum number of entries for the bounded strategy
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    /// Set the whole-store teardown debounce
    pub fn teardown_after(mut self, after: Duration) -> Self {
        self.config.teardown_after = Some(after);
        self
    }

    /// Enable or disable metrics tracking
    pub fn track_metrics(mut self, enabled: bool) -> Self {
        self.config.track_metrics = enabled;
        self
    }

    /// Build the configuration, validating it
    pub fn build(self) -> ConfigResult<MemoConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for config.
    use super::*;

    /// Validates `StorageStrategy::default` behavior for the strategy default
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `StorageStrategy::default()` equals
    ///   `StorageStrategy::Bounded`.
    #[test]
    fn test_storage_strategy_default() {
        assert_eq!(StorageStrategy::default(), StorageStrategy::Bounded);
    }

    /// Validates `MemoConfig::default` behavior for the memo config default
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `config.strategy` equals `StorageStrategy::Bounded`.
    /// - Confirms `config.max_entries` equals `DEFAULT_MAX_ENTRIES`.
    /// - Ensures `config.teardown_after.is_none()` evaluates to true.
    /// - Ensures `!config.track_metrics` evaluates to true.
    #[test]
    fn test_memo_config_default() {
        let config = MemoConfig::default();
        assert_eq!(config.strategy, StorageStrategy::Bounded);
        assert_eq!(config.max_entries, DEFAULT_MAX_ENTRIES);
        assert!(config.teardown_after.is_none());
        assert!(!config.track_metrics);
    }

    /// Validates `MemoConfig::bounded` behavior for the bounded preset
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `config.strategy` equals `StorageStrategy::Bounded`.
    /// - Confirms `config.max_entries` equals `2`.
    /// - Ensures `config.validate().is_ok()` evaluates to true.
    #[test]
    fn test_memo_config_bounded_preset() {
        let config = MemoConfig::bounded(2);

        assert_eq!(config.strategy, StorageStrategy::Bounded);
        assert_eq!(config.max_entries, 2);
        assert!(config.validate().is_ok());
    }

    /// Validates `MemoConfig::weak_identity` behavior for the weak-identity
    /// preset scenario.
    ///
    /// Assertions:
    /// - Confirms `config.strategy` equals `StorageStrategy::WeakIdentity`.
    /// - Ensures `config.validate().is_ok()` evaluates to true.
    #[test]
    fn test_memo_config_weak_identity_preset() {
        let config = MemoConfig::weak_identity();

        assert_eq!(config.strategy, StorageStrategy::WeakIdentity);
        assert!(config.validate().is_ok());
    }

    /// Validates `MemoConfig::validate` behavior for the zero capacity
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures `MemoConfig::bounded(0).validate().is_err()` evaluates to
    ///   true.
    /// - Ensures a zero `max_entries` is accepted by the weak-identity
    ///   strategy, which ignores it.
    #[test]
    fn test_memo_config_zero_capacity_rejected() {
        assert!(MemoConfig::bounded(0).validate().is_err());

        let weak = MemoConfig { max_entries: 0, ..MemoConfig::weak_identity() };
        assert!(weak.validate().is_ok());
    }

    /// Validates `MemoConfig::builder` behavior for the memo config builder
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `config.strategy` equals `StorageStrategy::Bounded`.
    /// - Confirms `config.max_entries` equals `500`.
    /// - Confirms `config.teardown_after` equals
    ///   `Some(Duration::from_millis(100))`.
    /// - Ensures `config.track_metrics` evaluates to true.
    #[test]
    fn test_memo_config_builder() {
        let config = MemoConfig::builder()
            .strategy(StorageStrategy::Bounded)
            .max_entries(500)
            .teardown_after(Duration::from_millis(100))
            .track_metrics(true)
            .build()
            .unwrap();

        assert_eq!(config.strategy, StorageStrategy::Bounded);
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.teardown_after, Some(Duration::from_millis(100)));
        assert!(config.track_metrics);
    }

    /// Validates `MemoConfigBuilder::build` behavior for the builder
    /// validation scenario.
    ///
    /// Assertions:
    /// - Ensures `result.is_err()` evaluates to true.
    #[test]
    fn test_memo_config_builder_rejects_zero_capacity() {
        let result = MemoConfig::builder().max_entries(0).build();
        assert!(result.is_err());
    }
}
