//! Error types for curve construction, calibration and bumping.

use strata_core::{CoreError, Date};
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Arguments failed validation before any work was done.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What is wrong.
        reason: String,
    },

    /// A quote is NaN or infinite.
    #[error("Quote {index} is not finite: {value}")]
    InvalidQuote {
        /// Position of the quote.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Instrument maturities do not produce strictly increasing knots.
    #[error("Non-monotonic maturities at instrument {index}: {previous} >= {current}")]
    NonMonotonicMaturities {
        /// Index of the offending instrument.
        index: usize,
        /// Maturity of the previous instrument.
        previous: Date,
        /// Maturity of this instrument.
        current: Date,
    },

    /// The instrument cannot produce the requested measure.
    #[error("{instrument} does not support measure {measure}")]
    UnsupportedMeasure {
        /// Instrument label.
        instrument: String,
        /// Measure name.
        measure: String,
    },

    /// A pricing call needed a curve the context does not carry.
    #[error("Missing {curve} curve in pricing context")]
    MissingCurve {
        /// Role of the missing curve.
        curve: &'static str,
    },

    /// A stretch could not be calibrated.
    #[error("Calibration of '{stretch}' failed: {reason}")]
    CalibrationFailure {
        /// Name of the latent-state stretch.
        stretch: String,
        /// Underlying failure.
        reason: String,
    },

    /// A label appears twice in a keyed collection.
    #[error("Duplicate label '{label}'")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// A fixing was set twice for the same date and index.
    #[error("Duplicate fixing for {label} on {date}")]
    DuplicateFixing {
        /// Fixing date.
        date: Date,
        /// Index label.
        label: String,
    },

    /// Underlying numerical failure.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Date or convention failure.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a calibration failure for the named stretch.
    #[must_use]
    pub fn calibration_failed(stretch: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CalibrationFailure {
            stretch: stretch.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported measure error.
    #[must_use]
    pub fn unsupported_measure(instrument: impl Into<String>, measure: impl ToString) -> Self {
        Self::UnsupportedMeasure {
            instrument: instrument.into(),
            measure: measure.to_string(),
        }
    }

    /// Creates a missing curve error.
    #[must_use]
    pub fn missing_curve(curve: &'static str) -> Self {
        Self::MissingCurve { curve }
    }

    /// Creates a duplicate label error.
    #[must_use]
    pub fn duplicate_label(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }
}
