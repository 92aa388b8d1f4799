//! SIMM interest-rate risk aggregation.
//!
//! Per-tenor margins of each curve family within one currency are combined
//! pairwise through a tenor correlation matrix:
//!
//! ```text
//! linear(A, B)    = Σ_i Σ_j mA(i) × mB(j) × ρ(i, j)
//! curvature(A, B) = Σ_i Σ_j mA(i) × mB(j) × ρ(i, j)²
//! ```
//!
//! Cross-family terms are further scaled by a single cross-curve correlation.

mod aggregate;
mod correlation;
mod family;

pub use aggregate::{curvature_covariance, linear_covariance, FamilyPair, IrCovarianceAggregate, RiskFactorAggregateIr};
pub use correlation::TenorCorrelation;
pub use family::IrCurveFamily;
