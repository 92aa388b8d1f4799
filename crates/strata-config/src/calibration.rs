//! Curve calibration settings.

use serde::{Deserialize, Serialize};
use strata_core::Tenor;
use strata_math::solvers::SolverConfig;
use strata_math::spline::{BoundaryCondition, SegmentControl};

use crate::error::{require_positive, Validate, ValidationError};

fn default_tolerance() -> f64 {
    1e-12
}

fn default_max_iterations() -> u32 {
    100
}

fn default_control() -> SegmentControl {
    SegmentControl::linear()
}

fn default_dense_tenor() -> Tenor {
    Tenor::THREE_MONTHS
}

/// Settings shared by every curve builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Absolute tolerance on each instrument's quoted measure.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap for each segment solve.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Segment basis and continuity for shape-preserving builds.
    ///
    /// The linear C⁰ default keeps a quote bump local: segments to the left
    /// of the bumped knot are untouched and later ones only see the shifted
    /// knot value, never an inherited slope.
    #[serde(default = "default_control")]
    pub control: SegmentControl,
    /// Boundary condition for discount-factor stretches.
    #[serde(default)]
    pub discount_boundary: BoundaryCondition,
    /// Reconstruction step for the swap leg of the DENSE methodology.
    #[serde(default = "default_dense_tenor")]
    pub dense_tenor: Tenor,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl CalibrationConfig {
    /// Standard settings: linear C⁰ segments, 1e-12 quote tolerance.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            control: default_control(),
            discount_boundary: BoundaryCondition::Natural,
            dense_tenor: default_dense_tenor(),
        }
    }

    /// Tighter tolerance and a larger iteration budget.
    #[must_use]
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 200,
            ..Self::standard()
        }
    }

    /// Replaces the segment control.
    #[must_use]
    pub fn with_control(mut self, control: SegmentControl) -> Self {
        self.control = control;
        self
    }

    /// Solver settings for segment root searches.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

impl Validate for CalibrationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "tolerance", self.tolerance);
        if self.max_iterations == 0 {
            errors.push(ValidationError::new("max_iterations", "must be at least 1"));
        }
        if let Err(e) = self.control.validate() {
            errors.push(ValidationError::new("control", e.to_string()));
        }
        errors
    }
}
