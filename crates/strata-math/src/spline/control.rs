//! Segment design controls and boundary conditions.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::spline::SegmentBasis;

/// Basis choice plus the continuity order enforced at segment joins.
///
/// Coefficients left free after the value and continuity constraints are
/// chosen to minimize the segment curvature `∫ y''(x)² dx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentControl {
    /// Segment basis family.
    pub basis: SegmentBasis,
    /// Number of derivatives matched across joins (0, 1 or 2).
    pub continuity: usize,
}

impl Default for SegmentControl {
    fn default() -> Self {
        Self {
            basis: SegmentBasis::cubic(),
            continuity: 1,
        }
    }
}

impl SegmentControl {
    /// Creates a validated control.
    pub fn new(basis: SegmentBasis, continuity: usize) -> MathResult<Self> {
        let control = Self { basis, continuity };
        control.validate()?;
        Ok(control)
    }

    /// Piecewise linear, C⁰.
    #[must_use]
    pub fn linear() -> Self {
        Self {
            basis: SegmentBasis::linear(),
            continuity: 0,
        }
    }

    /// Checks the basis and that it has room for the continuity constraints.
    pub fn validate(&self) -> MathResult<()> {
        self.basis.validate()?;
        if self.continuity > 2 {
            return Err(MathError::invalid_input(format!(
                "continuity order {} is above the supported maximum of 2",
                self.continuity
            )));
        }
        if self.continuity + 2 > self.basis.size() {
            return Err(MathError::invalid_input(format!(
                "{} has {} functions, too few for C{} continuity",
                self.basis,
                self.basis.size(),
                self.continuity
            )));
        }
        Ok(())
    }

    /// True if an edge condition on the second derivative is meaningful.
    pub(crate) fn supports_edge_conditions(&self) -> bool {
        self.basis.size() >= 3 && self.continuity >= 1
    }
}

/// Conditions imposed at the two edges of a stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// Zero second derivative at both edges.
    #[default]
    Natural,
    /// Zero second derivative at the left edge and zero slope at the right
    /// edge, leaving the response flat into extrapolation.
    Financial,
}
