//! Per-family margins and their pairwise covariance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_config::{SimmConfig, Validate};

use super::correlation::TenorCorrelation;
use super::family::IrCurveFamily;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::report::TenorValues;

/// Weighted tenor margins for every curve family of one currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorAggregateIr {
    margins: BTreeMap<IrCurveFamily, TenorValues>,
}

impl RiskFactorAggregateIr {
    /// No families.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one family's margins in tenor order.
    pub fn with_family(mut self, family: IrCurveFamily, margins: TenorValues) -> AnalyticsResult<Self> {
        if self.margins.contains_key(&family) {
            return Err(AnalyticsError::invalid_input(format!("{family} margins given twice")));
        }
        for (i, (tenor, margin)) in margins.iter().enumerate() {
            if !margin.is_finite() {
                return Err(AnalyticsError::invalid_input(format!("{family} {tenor} margin is not finite")));
            }
            if margins[..i].iter().any(|(t, _)| t == tenor) {
                return Err(AnalyticsError::invalid_input(format!("{family} tenor {tenor} appears twice")));
            }
        }
        self.margins.insert(family, margins);
        Ok(self)
    }

    /// Adds a family from raw sensitivities scaled by per-tenor risk weights.
    pub fn with_sensitivities(
        self,
        family: IrCurveFamily,
        sensitivities: &[(String, f64)],
        risk_weights: &BTreeMap<String, f64>,
    ) -> AnalyticsResult<Self> {
        let margins = sensitivities
            .iter()
            .map(|(tenor, s)| {
                let weight = risk_weights
                    .get(tenor)
                    .ok_or_else(|| AnalyticsError::UnknownTenor(tenor.clone()))?;
                Ok((tenor.clone(), s * weight))
            })
            .collect::<AnalyticsResult<TenorValues>>()?;
        self.with_family(family, margins)
    }

    /// Margins of `family`; empty if it was never added.
    pub fn margins(&self, family: IrCurveFamily) -> &[(String, f64)] {
        self.margins.get(&family).map_or(&[], Vec::as_slice)
    }

    /// Sum of every margin of every family.
    pub fn cumulative_margin(&self) -> f64 {
        self.margins.values().flatten().map(|(_, m)| m).sum()
    }
}

fn double_sum(
    a: &[(String, f64)],
    b: &[(String, f64)],
    correlation: &TenorCorrelation,
    law: impl Fn(f64) -> f64,
) -> AnalyticsResult<f64> {
    let mut total = 0.0;
    for (tenor_a, margin_a) in a {
        for (tenor_b, margin_b) in b {
            total += margin_a * margin_b * law(correlation.correlation(tenor_a, tenor_b)?);
        }
    }
    Ok(total)
}

/// `Σ_i Σ_j a(i) × b(j) × ρ(i, j)`.
pub fn linear_covariance(a: &[(String, f64)], b: &[(String, f64)], correlation: &TenorCorrelation) -> AnalyticsResult<f64> {
    double_sum(a, b, correlation, |rho| rho)
}

/// `Σ_i Σ_j a(i) × b(j) × ρ(i, j)²`.
pub fn curvature_covariance(
    a: &[(String, f64)],
    b: &[(String, f64)],
    correlation: &TenorCorrelation,
) -> AnalyticsResult<f64> {
    double_sum(a, b, correlation, |rho| rho * rho)
}

/// Covariance terms for one unordered family pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyPair {
    /// First family.
    pub first: IrCurveFamily,
    /// Second family; equal to `first` for a self term.
    pub second: IrCurveFamily,
    /// Linear covariance, cross-curve scaled for distinct families.
    pub linear: f64,
    /// Curvature covariance, cross-curve scaled for distinct families.
    pub curvature: f64,
}

impl FamilyPair {
    /// True for a family with itself.
    pub fn is_self(&self) -> bool {
        self.first == self.second
    }
}

/// All 28 family pair terms of one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrCovarianceAggregate {
    pairs: Vec<FamilyPair>,
    cumulative_margin: f64,
}

impl IrCovarianceAggregate {
    /// Computes every pair term of `risk` under `correlation`.
    pub fn new(risk: &RiskFactorAggregateIr, correlation: &TenorCorrelation, config: &SimmConfig) -> AnalyticsResult<Self> {
        config.validate_or_error()?;
        let families = IrCurveFamily::ALL;
        let mut pairs = Vec::with_capacity(families.len() * (families.len() + 1) / 2);
        for (i, &first) in families.iter().enumerate() {
            for &second in &families[i..] {
                let (a, b) = (risk.margins(first), risk.margins(second));
                let scale = if first == second { 1.0 } else { config.cross_curve_correlation };
                pairs.push(FamilyPair {
                    first,
                    second,
                    linear: scale * linear_covariance(a, b, correlation)?,
                    curvature: scale * curvature_covariance(a, b, correlation)?,
                });
            }
        }
        log::debug!("Aggregated {} family pairs", pairs.len());
        Ok(Self {
            pairs,
            cumulative_margin: risk.cumulative_margin(),
        })
    }

    /// Pair terms in family order.
    pub fn pairs(&self) -> &[FamilyPair] {
        &self.pairs
    }

    /// The term for `a` and `b` in either order.
    pub fn pair(&self, a: IrCurveFamily, b: IrCurveFamily) -> Option<&FamilyPair> {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        self.pairs.iter().find(|p| p.first == first && p.second == second)
    }

    /// Sum of all individual margins.
    pub fn cumulative_margin(&self) -> f64 {
        self.cumulative_margin
    }

    fn total(&self, term: impl Fn(&FamilyPair) -> f64) -> f64 {
        self.pairs
            .iter()
            .map(|p| if p.is_self() { term(p) } else { 2.0 * term(p) })
            .sum()
    }

    /// Full quadratic form of the linear terms.
    pub fn total_linear(&self) -> f64 {
        self.total(|p| p.linear)
    }

    /// Full quadratic form of the curvature terms.
    pub fn total_curvature(&self) -> f64 {
        self.total(|p| p.curvature)
    }

    /// `sqrt(max(total_linear, 0))`.
    pub fn delta_margin(&self) -> f64 {
        self.total_linear().max(0.0).sqrt()
    }

    /// `sqrt(max(total_curvature, 0))`.
    pub fn curvature_margin(&self) -> f64 {
        self.total_curvature().max(0.0).sqrt()
    }
}
