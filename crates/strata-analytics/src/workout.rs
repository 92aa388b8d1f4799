//! Yield-to-worst workout resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::Date;
use strata_curves::cashflows::yield_from_price;
use strata_curves::context::PricingContext;
use strata_math::solvers::SolverConfig;

use crate::bond::Bond;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::{cash_flows, flows_to_workout};

/// What ends the bond's life in a workout scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutKind {
    /// Redemption at final maturity.
    Maturity,
    /// Issuer call.
    Call,
    /// Holder put.
    Put,
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Maturity => "Maturity",
            Self::Call => "Call",
            Self::Put => "Put",
        };
        f.write_str(name)
    }
}

/// The exercise scenario every to-workout measure is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Redemption date.
    pub date: Date,
    /// Redemption price as a fraction of par.
    pub factor: f64,
    /// Scenario type.
    pub kind: WorkoutKind,
    /// Yield of the dirty price to this workout.
    pub yield_to_workout: f64,
}

fn candidates(bond: &Bond, settlement: Date) -> Vec<(Date, f64, WorkoutKind)> {
    let mut out: Vec<_> = bond
        .calls()
        .iter()
        .map(|e| (e.date, e.price_decimal(), WorkoutKind::Call))
        .chain(bond.puts().iter().map(|e| (e.date, e.price_decimal(), WorkoutKind::Put)))
        .filter(|(date, _, _)| *date > settlement)
        .collect();
    out.push((bond.maturity(), 1.0, WorkoutKind::Maturity));
    out.sort_by_key(|c| c.0);
    out
}

/// Picks the scenario with the lowest yield for `dirty_price` (per unit face).
///
/// Scenarios whose yield cannot be solved are skipped. Ties go to the
/// earlier date.
pub fn resolve_workout(
    bond: &Bond,
    settlement: Date,
    dirty_price: f64,
    ctx: &PricingContext<'_>,
    config: &SolverConfig,
) -> AnalyticsResult<Workout> {
    if settlement >= bond.maturity() {
        return Err(AnalyticsError::invalid_input(format!(
            "{}: settlement {settlement} is not before maturity",
            bond.label()
        )));
    }
    let mut worst: Option<Workout> = None;
    for (date, factor, kind) in candidates(bond, settlement) {
        let flows = cash_flows(&flows_to_workout(bond, settlement, date, factor, ctx)?);
        let y = match yield_from_price(&flows, settlement, dirty_price, bond.frequency(), config) {
            Ok(y) => y,
            Err(e) => {
                log::debug!("{}: no yield to {kind} on {date}: {e}", bond.label());
                continue;
            }
        };
        if worst.map_or(true, |w| y < w.yield_to_workout) {
            worst = Some(Workout {
                date,
                factor,
                kind,
                yield_to_workout: y,
            });
        }
    }
    worst.ok_or_else(|| {
        AnalyticsError::invalid_input(format!("{}: no workout scenario has a yield", bond.label()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use strata_core::Frequency;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn callable() -> Bond {
        Bond::builder("CALL", d(2025, 1, 15), d(2035, 1, 15))
            .fixed(0.06)
            .frequency(Frequency::Annual)
            .call(d(2030, 1, 15), 100.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_premium_callable_works_out_to_call() {
        let settle = d(2025, 1, 15);
        let ctx = PricingContext::new(settle);
        let workout = resolve_workout(&callable(), settle, 1.05, &ctx, &SolverConfig::default()).unwrap();
        assert_eq!(workout.kind, WorkoutKind::Call);
        assert_eq!(workout.date, d(2030, 1, 15));
        assert_abs_diff_eq!(workout.factor, 1.0);
    }

    #[test]
    fn test_discount_callable_works_out_to_maturity() {
        let settle = d(2025, 1, 15);
        let ctx = PricingContext::new(settle);
        let workout = resolve_workout(&callable(), settle, 0.95, &ctx, &SolverConfig::default()).unwrap();
        assert_eq!(workout.kind, WorkoutKind::Maturity);
        assert_eq!(workout.date, d(2035, 1, 15));
        assert!(workout.yield_to_workout > 0.06);
    }

    #[test]
    fn test_past_calls_are_ignored() {
        let settle = d(2031, 1, 15);
        let ctx = PricingContext::new(settle);
        let workout = resolve_workout(&callable(), settle, 1.05, &ctx, &SolverConfig::default()).unwrap();
        assert_eq!(workout.kind, WorkoutKind::Maturity);
        assert!(resolve_workout(&callable(), d(2035, 1, 15), 1.0, &ctx, &SolverConfig::default()).is_err());
    }
}
