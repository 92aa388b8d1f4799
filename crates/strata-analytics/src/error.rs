//! Error types for replication and risk aggregation.

use strata_config::ConfigError;
use strata_core::{CoreError, Date};
use strata_curves::CurveError;
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Unified error type for all analytics operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    // ========== Input Errors ==========
    /// Invalid input parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A floating coupon fixed in the past has no fixing.
    #[error("no {index} fixing for {date}")]
    MissingFixing {
        /// Index label.
        index: String,
        /// Fixing date.
        date: Date,
    },

    // ========== Report Errors ==========
    /// A report field name is empty or padded.
    #[error("invalid field name '{0}'")]
    InvalidFieldName(String),

    /// A report field was inserted twice.
    #[error("duplicate field '{0}'")]
    DuplicateField(String),

    /// A field the report cannot exist without failed.
    #[error("mandatory field '{field}' failed: {reason}")]
    MandatoryField {
        /// Field name.
        field: String,
        /// Underlying failure.
        reason: String,
    },

    // ========== Risk Errors ==========
    /// A tenor label is missing from a correlation matrix.
    #[error("tenor '{0}' is not in the correlation matrix")]
    UnknownTenor(String),

    /// Key rate duration calculation failed.
    #[error("key rate duration calculation failed: {0}")]
    KeyRateDurationFailed(String),

    // ========== Wrapped Errors ==========
    /// Curve construction or pricing failure.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    /// Numerical failure.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Date or convention failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Settings failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Wraps a failure of a mandatory report field.
    #[must_use]
    pub fn mandatory(field: impl Into<String>, cause: &Self) -> Self {
        Self::MandatoryField {
            field: field.into(),
            reason: cause.to_string(),
        }
    }
}
