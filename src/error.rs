//! Error types for bloomgate operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`], whose error
//! type is [`FilterError`]. Errors are reported synchronously by the call that
//! detects them and are never retried internally: the filters perform no I/O,
//! so there are no transient failures.
//!
//! # Error Propagation
//!
//! ```
//! use bloomgate::{Result, FilterError};
//! use bloomgate::core::params::{optimal_bit_count, optimal_hash_count};
//!
//! fn sizing(n: u64, p: f64) -> Result<(u64, u32)> {
//!     let m = optimal_bit_count(n, p)?;
//!     let k = optimal_hash_count(m, n)?;
//!     Ok((m, k))
//! }
//! # assert!(sizing(1000, 0.01).is_ok());
//! # assert!(matches!(sizing(0, 0.01), Err(FilterError::InvalidParameter { .. })));
//! ```

#![allow(clippy::module_name_repetitions)]

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur while building, merging, or restoring filters.
///
/// `Clone` and `PartialEq` are derived so tests can compare errors directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Sizing inputs or explicit parameters are out of range.
    ///
    /// Raised for `n_expected == 0`, a false positive rate outside `(0, 1)`,
    /// `m == 0`, or a hash count outside the supported range.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected input.
        message: String,
    },

    /// An item could not be canonicalized to bytes.
    #[error("Encoding error: {message}")]
    EncodingError {
        /// Description of the encoding failure.
        message: String,
    },

    /// Two filters do not share bit count, hash count, and seed.
    #[error("Incompatible filters: {reason}")]
    IncompatibleFilter {
        /// Which parameter differed.
        reason: String,
    },

    /// A serialized payload is malformed, truncated, or of an unknown version.
    #[error("Corrupt data: {message}")]
    CorruptData {
        /// What failed validation.
        message: String,
    },

    /// A counting filter detected caller misuse, such as removing an item
    /// whose counters are already zero.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// Description of the broken invariant.
        message: String,
    },
}

impl FilterError {
    /// Create an [`InvalidParameter`](Self::InvalidParameter) error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an [`EncodingError`](Self::EncodingError) error.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Create an [`IncompatibleFilter`](Self::IncompatibleFilter) error.
    #[must_use]
    pub fn incompatible_filter(reason: impl Into<String>) -> Self {
        Self::IncompatibleFilter {
            reason: reason.into(),
        }
    }

    /// Create a [`CorruptData`](Self::CorruptData) error.
    #[must_use]
    pub fn corrupt_data(message: impl Into<String>) -> Self {
        Self::CorruptData {
            message: message.into(),
        }
    }

    /// Create an [`InvariantViolation`](Self::InvariantViolation) error.
    #[must_use]
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<bincode::Error> for FilterError {
    fn from(err: bincode::Error) -> Self {
        Self::encoding_error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_parameter() {
        let err = FilterError::invalid_parameter("n_expected must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("Invalid parameter"));
        assert!(msg.contains("n_expected must be > 0"));
    }

    #[test]
    fn test_display_incompatible_filter() {
        let err = FilterError::incompatible_filter("bit count mismatch: 64 vs 128");
        assert_eq!(
            err.to_string(),
            "Incompatible filters: bit count mismatch: 64 vs 128"
        );
    }

    #[test]
    fn test_display_corrupt_data() {
        let err = FilterError::corrupt_data("unsupported format version 7");
        assert!(err.to_string().starts_with("Corrupt data"));
        assert!(err.to_string().contains("version 7"));
    }

    #[test]
    fn test_display_encoding_and_invariant() {
        assert!(FilterError::encoding_error("x")
            .to_string()
            .contains("Encoding error"));
        assert!(FilterError::invariant_violation("counter underflow")
            .to_string()
            .contains("counter underflow"));
    }

    #[test]
    fn test_error_implements_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<FilterError>();
    }

    #[test]
    fn test_error_clone_eq() {
        let err = FilterError::corrupt_data("truncated");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(FilterError::invalid_parameter("bad"))
        }
        fn outer() -> Result<u32> {
            inner()?;
            Ok(1)
        }
        assert!(matches!(outer(), Err(FilterError::InvalidParameter { .. })));
    }
}
