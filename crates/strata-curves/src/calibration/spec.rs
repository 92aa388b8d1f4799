//! Latent-state stretch specifications.

use serde::{Deserialize, Serialize};
use strata_core::{Currency, Date};

use super::CalibrationLeg;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{CalibrationInstrument, QuoteMeasure};

/// The quantity a stretch carries as its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatentStateKind {
    /// Funding discount factor.
    DiscountFactor,
    /// Index forward rate.
    ForwardRate,
    /// Government bond yield.
    GovvieYield,
    /// Default intensity.
    HazardRate,
}

impl std::fmt::Display for LatentStateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DiscountFactor => "DiscountFactor",
            Self::ForwardRate => "ForwardRate",
            Self::GovvieYield => "GovvieYield",
            Self::HazardRate => "HazardRate",
        };
        f.write_str(name)
    }
}

/// Named legs calibrated together into one stretch.
///
/// Legs are concatenated in order (e.g. deposits then swaps); the pillar
/// dates of the concatenation become the stretch knots.
#[derive(Debug, Clone)]
pub struct LatentStateStretchSpec {
    name: String,
    kind: LatentStateKind,
    legs: Vec<CalibrationLeg>,
}

impl LatentStateStretchSpec {
    /// Binds legs to a latent state.
    pub fn new(name: impl Into<String>, kind: LatentStateKind, legs: Vec<CalibrationLeg>) -> CurveResult<Self> {
        let name = name.into();
        if legs.is_empty() {
            return Err(CurveError::invalid_input(format!("stretch '{name}' has no legs")));
        }
        Ok(Self { name, kind, legs })
    }

    /// Stretch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latent state kind.
    #[must_use]
    pub fn kind(&self) -> LatentStateKind {
        self.kind
    }

    /// The legs.
    #[must_use]
    pub fn legs(&self) -> &[CalibrationLeg] {
        &self.legs
    }

    /// Pay currency of the first instrument.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.legs[0].instruments()[0].currency()
    }

    /// Total instrument count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.legs.iter().map(CalibrationLeg::len).sum()
    }

    /// Always false; a spec holds at least one leg.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `(instrument, quote, measure)` across legs, in order.
    pub fn entries(&self) -> impl Iterator<Item = (&dyn CalibrationInstrument, f64, QuoteMeasure)> + '_ {
        self.legs.iter().flat_map(CalibrationLeg::iter)
    }

    /// Instrument labels across legs.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.entries().map(|(inst, _, _)| inst.label().to_string()).collect()
    }

    /// Quotes across legs.
    #[must_use]
    pub fn quotes(&self) -> Vec<f64> {
        self.entries().map(|(_, q, _)| q).collect()
    }

    /// The same spec with replacement quotes, given across legs.
    pub fn with_quotes(&self, quotes: &[f64]) -> CurveResult<Self> {
        if quotes.len() != self.len() {
            return Err(CurveError::invalid_input(format!(
                "{} quotes for {} instruments",
                quotes.len(),
                self.len()
            )));
        }
        let mut offset = 0;
        let mut legs = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            legs.push(leg.with_quotes(quotes[offset..offset + leg.len()].to_vec())?);
            offset += leg.len();
        }
        Ok(Self {
            name: self.name.clone(),
            kind: self.kind,
            legs,
        })
    }

    /// Pillar dates across legs, which must strictly increase and follow `valuation_date`.
    pub fn pillars(&self, valuation_date: Date) -> CurveResult<Vec<Date>> {
        let pillars: Vec<Date> = self.entries().map(|(inst, _, _)| inst.pillar_date(self.kind)).collect();
        if pillars[0] <= valuation_date {
            return Err(CurveError::invalid_input(format!(
                "first pillar {} does not follow valuation date {valuation_date}",
                pillars[0]
            )));
        }
        for (index, pair) in pillars.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(CurveError::NonMonotonicMaturities {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(pillars)
    }

    /// Stretch knots: zero, then each pillar as ACT/365F years from `valuation_date`.
    pub fn knots(&self, valuation_date: Date) -> CurveResult<Vec<f64>> {
        let mut knots = vec![0.0];
        knots.extend(
            self.pillars(valuation_date)?
                .iter()
                .map(|m| valuation_date.days_between(m) as f64 / 365.0),
        );
        Ok(knots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Deposit, Swap};
    use std::sync::Arc;
    use strata_core::Tenor;

    fn spot() -> Date {
        Date::from_ymd(2025, 1, 6).unwrap()
    }

    fn leg(tenors: &[&str], quotes: Vec<f64>, swaps: bool) -> CalibrationLeg {
        let instruments: Vec<Arc<dyn CalibrationInstrument>> = tenors
            .iter()
            .map(|t| {
                let tenor: Tenor = t.parse().unwrap();
                if swaps {
                    Arc::new(Swap::from_tenor(spot(), tenor, Currency::EUR).unwrap()) as Arc<dyn CalibrationInstrument>
                } else {
                    Arc::new(Deposit::from_tenor(spot(), tenor, Currency::EUR).unwrap()) as Arc<dyn CalibrationInstrument>
                }
            })
            .collect();
        let measure = if swaps { QuoteMeasure::SwapRate } else { QuoteMeasure::Rate };
        CalibrationLeg::uniform(instruments, quotes, measure).unwrap()
    }

    #[test]
    fn test_knots_and_currency() {
        let spec = LatentStateStretchSpec::new(
            "EUR",
            LatentStateKind::DiscountFactor,
            vec![leg(&["3M", "6M"], vec![0.03, 0.031], false), leg(&["2Y", "5Y"], vec![0.032, 0.034], true)],
        )
        .unwrap();
        assert_eq!(spec.currency(), Currency::EUR);
        assert_eq!(spec.len(), 4);
        assert_eq!(spec.labels(), vec!["3M", "6M", "2Y", "5Y"]);
        let knots = spec.knots(spot()).unwrap();
        assert_eq!(knots.len(), 5);
        assert_eq!(knots[0], 0.0);
        assert!(knots.windows(2).all(|w| w[1] > w[0]));

        let requoted = spec.with_quotes(&[0.01, 0.02, 0.03, 0.04]).unwrap();
        assert_eq!(requoted.legs()[1].quotes(), &[0.03, 0.04]);
        assert!(spec.with_quotes(&[0.01]).is_err());
    }

    #[test]
    fn test_overlapping_legs_rejected() {
        let spec = LatentStateStretchSpec::new(
            "EUR",
            LatentStateKind::DiscountFactor,
            vec![leg(&["3M", "1Y"], vec![0.03, 0.031], false), leg(&["1Y", "5Y"], vec![0.032, 0.034], true)],
        )
        .unwrap();
        assert!(matches!(
            spec.knots(spot()),
            Err(CurveError::NonMonotonicMaturities { index: 2, .. })
        ));
        assert!(LatentStateStretchSpec::new("X", LatentStateKind::ForwardRate, Vec::new()).is_err());
    }
}
