//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// The objective returned NaN or infinity.
    #[error("Non-finite function value at x = {x}")]
    NonFinite {
        /// Where the function was evaluated.
        x: f64,
    },

    /// Matrix is singular (not invertible).
    #[error("Singular matrix: {context}")]
    SingularMatrix {
        /// What system was being solved.
        context: String,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Knots are not strictly increasing.
    #[error("Knots must be strictly increasing: x[{index}] = {value} does not exceed its predecessor")]
    NonIncreasingKnots {
        /// Offending knot index.
        index: usize,
        /// Offending knot value.
        value: f64,
    },

    /// A spline segment could not be calibrated.
    #[error("Segment {segment} calibration failed: {reason}")]
    SegmentCalibration {
        /// Zero-based segment index.
        segment: usize,
        /// Underlying cause.
        reason: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a singular matrix error.
    #[must_use]
    pub fn singular(context: impl Into<String>) -> Self {
        Self::SingularMatrix {
            context: context.into(),
        }
    }

    /// Creates a segment calibration error.
    #[must_use]
    pub fn segment_calibration(segment: usize, reason: impl Into<String>) -> Self {
        Self::SegmentCalibration {
            segment,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::convergence_failed(100, 1e-6);
        assert!(err.to_string().contains("100 iterations"));

        let err = MathError::NonIncreasingKnots {
            index: 3,
            value: 1.5,
        };
        assert!(err.to_string().contains("x[3]"));
    }
}
