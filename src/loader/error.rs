//! Loader error types
//!
//! Only construction can fail. Double starts, stops while idle and stale
//! ticks are absorbed by the controller's state guards.

use thiserror::Error;

/// Errors raised while building a source list or a loader
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// Lower delay bound is above the upper bound
    #[error("Invalid delay range: min {min}ms is greater than max {max}ms")]
    InvalidDelayRange { min: u64, max: u64 },

    /// Step must reveal at least one row per tick
    #[error("Invalid step: must reveal at least one row per tick")]
    InvalidStep,

    /// Two rows in a source list share the same identity
    #[error("Duplicate row key: {0}")]
    DuplicateKey(String),

    /// Loader created outside of a tokio runtime
    #[error("No tokio runtime available to drive the loader")]
    NoRuntime,
}

/// Result type alias for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoaderError::InvalidDelayRange { min: 900, max: 100 };
        assert_eq!(
            err.to_string(),
            "Invalid delay range: min 900ms is greater than max 100ms"
        );

        let err = LoaderError::DuplicateKey("12344433".to_string());
        assert_eq!(err.to_string(), "Duplicate row key: 12344433");
    }
}
