//! Bumping, replication and SIMM settings.

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, Validate, ValidationError};

fn default_bump_bp() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_recovery() -> f64 {
    0.4
}

fn default_yield_tolerance() -> f64 {
    1e-10
}

fn default_cross_curve_correlation() -> f64 {
    0.98
}

/// Settings for bumped curve families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BumpConfig {
    /// Bump size in basis points of the quote.
    #[serde(default = "default_bump_bp")]
    pub bump_bp: f64,
    /// Also build the parallel ("bump") entry.
    #[serde(default = "default_true")]
    pub include_parallel: bool,
    /// Calibrate tenors on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel_execution: bool,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl BumpConfig {
    /// One basis point, parallel entry included, data-parallel.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bump_bp: default_bump_bp(),
            include_parallel: true,
            parallel_execution: true,
        }
    }

    /// Bump in quote units.
    #[must_use]
    pub fn bump_amount(&self) -> f64 {
        self.bump_bp * 1e-4
    }
}

impl Validate for BumpConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "bump_bp", self.bump_bp);
        errors
    }
}

/// Settings for the bond replicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicationConfig {
    /// Parallel yield bump for effective duration, in basis points.
    #[serde(default = "default_bump_bp")]
    pub effective_duration_bump_bp: f64,
    /// Recovery rate for credit-risky repricing.
    #[serde(default = "default_recovery")]
    pub recovery_rate: f64,
    /// Tolerance for yield, spread and basis solves.
    #[serde(default = "default_yield_tolerance")]
    pub yield_tolerance: f64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            effective_duration_bump_bp: default_bump_bp(),
            recovery_rate: default_recovery(),
            yield_tolerance: default_yield_tolerance(),
        }
    }
}

impl Validate for ReplicationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, "effective_duration_bump_bp", self.effective_duration_bump_bp);
        require_positive(&mut errors, "yield_tolerance", self.yield_tolerance);
        if !(0.0..1.0).contains(&self.recovery_rate) {
            errors.push(ValidationError::new(
                "recovery_rate",
                format!("must lie in [0, 1), got {}", self.recovery_rate),
            ));
        }
        errors
    }
}

/// Settings for SIMM interest-rate aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimmConfig {
    /// Correlation applied to every cross-family term.
    #[serde(default = "default_cross_curve_correlation")]
    pub cross_curve_correlation: f64,
}

impl Default for SimmConfig {
    fn default() -> Self {
        Self {
            cross_curve_correlation: default_cross_curve_correlation(),
        }
    }
}

impl Validate for SimmConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(-1.0..=1.0).contains(&self.cross_curve_correlation) {
            errors.push(ValidationError::new(
                "cross_curve_correlation",
                format!("must lie in [-1, 1], got {}", self.cross_curve_correlation),
            ));
        }
        errors
    }
}
