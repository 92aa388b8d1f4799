//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date, tenor and convention handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or out-of-range date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string could not be parsed.
    #[error("Invalid tenor '{tenor}': {reason}")]
    InvalidTenor {
        /// The offending tenor text.
        tenor: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown currency code.
    #[error("Unknown currency: {code}")]
    UnknownCurrency {
        /// The unrecognized code.
        code: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(tenor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_tenor("7Q", "unknown unit");
        assert_eq!(err.to_string(), "Invalid tenor '7Q': unknown unit");

        let err = CoreError::invalid_date("2025-02-30");
        assert!(err.to_string().contains("2025-02-30"));
    }
}
