//! Result and error types for stub-builder.
//!
//! The interception layer itself never fails: reads, writes and instance
//! creation are infallible. Errors only come from configuration, typed value
//! access and the built-in double's assertion helpers.

use thiserror::Error;

/// Result type for stub-builder operations
pub type StubResult<T> = Result<T, StubError>;

/// Errors that can occur around stubbed instances
#[derive(Debug, Error)]
pub enum StubError {
    /// Exclusion pattern failed to compile
    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern source
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// Factory configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Member is excluded from materialization and was never set
    #[error("Member '{member}' is excluded and has no value")]
    Excluded {
        /// Member name
        member: String,
    },

    /// Member holds a test double where a plain value was expected
    #[error("Member '{member}' holds a stub, not a plain value")]
    NotAValue {
        /// Member name
        member: String,
    },

    /// Member holds a plain value of another type
    #[error("Member '{member}' is not a {expected}")]
    TypeMismatch {
        /// Member name
        member: String,
        /// Requested type name
        expected: &'static str,
    },

    /// Assertion on a test double failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },
}

impl StubError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }
}

impl From<serde_yaml_ng::Error> for StubError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::config(err.to_string())
    }
}
