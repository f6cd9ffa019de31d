//! Configuration error types.
//!
//! The wrapper owns no error type for wrapped operations: operation failures
//! pass through with their content and type untouched (see the crate docs on
//! error propagation). The only library-owned failures are configuration
//! problems surfaced at construction time.

use thiserror::Error;

/// Simple configuration error for validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supplied configuration is rejected with an explanation
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Human-readable reason the configuration was rejected
        message: String,
    },
}

/// Configuration result type using simple config errors
pub type ConfigResult<T> = Result<T, ConfigError>;
