//! Calibration instruments.
//!
//! Each instrument prices one or more quoted measures against a
//! [`PricingContext`]. Calibration drives the measure towards the quote by
//! adjusting the latent state the context exposes.
//!
//! ## Money market
//! - [`Deposit`]: simple-interest deposit
//! - [`RateFuture`]: three-month rate future, quoted as rate or price
//! - [`Fra`]: forward rate agreement, projected off a forward source when present
//!
//! ## Swaps
//! - [`Swap`]: fixed-for-floating swap, single-curve or projected
//!
//! ## Government and credit
//! - [`TreasuryBond`]: coupon bond quoted by yield or price
//! - [`CreditDefaultSwap`]: par-spread quoted CDS

mod bond;
mod cds;
mod deposit;
mod fra;
mod future;
mod swap;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_core::{Currency, Date};

pub use bond::TreasuryBond;
pub use cds::CreditDefaultSwap;
pub use deposit::Deposit;
pub use fra::Fra;
pub use future::RateFuture;
pub use swap::Swap;

use crate::calibration::LatentStateKind;
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// Money market deposit.
    Deposit,
    /// Forward rate agreement.
    Fra,
    /// Rate future.
    Future,
    /// Interest rate swap.
    Swap,
    /// Government coupon bond.
    TreasuryBond,
    /// Credit default swap.
    CreditDefaultSwap,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deposit => "Deposit",
            Self::Fra => "FRA",
            Self::Future => "Future",
            Self::Swap => "Swap",
            Self::TreasuryBond => "Treasury",
            Self::CreditDefaultSwap => "CDS",
        };
        f.write_str(name)
    }
}

/// A quoted (manifest) measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteMeasure {
    /// Simple money-market rate.
    Rate,
    /// Par swap rate.
    SwapRate,
    /// Forward rate of a FRA or future.
    ForwardRate,
    /// Yield to maturity.
    Yield,
    /// Clean price per 100.
    Price,
    /// CDS par spread.
    ParSpread,
}

impl QuoteMeasure {
    /// True for measures quoted as a rate or yield.
    #[must_use]
    pub fn is_rate_like(&self) -> bool {
        !matches!(self, Self::Price)
    }
}

impl FromStr for QuoteMeasure {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rate" | "depositrate" => Ok(Self::Rate),
            "swaprate" | "parrate" => Ok(Self::SwapRate),
            "forwardrate" | "fraterate" | "futuresrate" => Ok(Self::ForwardRate),
            "yield" => Ok(Self::Yield),
            "price" | "cleanprice" => Ok(Self::Price),
            "parspread" | "fairpremium" | "spread" => Ok(Self::ParSpread),
            _ => Err(CurveError::invalid_input(format!("unknown quote measure '{s}'"))),
        }
    }
}

impl fmt::Display for QuoteMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rate => "Rate",
            Self::SwapRate => "SwapRate",
            Self::ForwardRate => "ForwardRate",
            Self::Yield => "Yield",
            Self::Price => "Price",
            Self::ParSpread => "ParSpread",
        };
        f.write_str(name)
    }
}

/// A market instrument used to calibrate a curve.
///
/// Instruments are immutable. [`with_maturity`](CalibrationInstrument::with_maturity)
/// builds a sibling with the same conventions and a different maturity, which
/// is how synthetic DENSE instruments are made.
pub trait CalibrationInstrument: Send + Sync + fmt::Debug {
    /// Start of accrual.
    fn effective_date(&self) -> Date;

    /// Final payment date.
    fn maturity_date(&self) -> Date;

    /// Pay currency.
    fn currency(&self) -> Currency;

    /// Tenor label such as "5Y".
    fn label(&self) -> &str;

    /// Instrument family.
    fn kind(&self) -> InstrumentKind;

    /// Date whose knot carries this instrument in a `kind` stretch.
    ///
    /// The maturity for everything except rate-fixing instruments in a
    /// forward-rate stretch, which sit at their fixing date.
    fn pillar_date(&self, kind: LatentStateKind) -> Date {
        let _ = kind;
        self.maturity_date()
    }

    /// Computes `measure` in `ctx`.
    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64>;

    /// Same conventions and start, new maturity.
    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>>;
}

/// Simply compounded forward between two dates off a discount curve.
pub(crate) fn simple_forward(curve: &dyn Curve, start: Date, end: Date, accrual: f64) -> CurveResult<f64> {
    if accrual <= 0.0 {
        return Err(CurveError::invalid_input(format!(
            "accrual period {start} to {end} is empty"
        )));
    }
    let df_start = curve.discount_factor_at(start)?;
    let df_end = curve.discount_factor_at(end)?;
    Ok((df_start / df_end - 1.0) / accrual)
}

/// Rejects a maturity that does not follow the effective date.
pub(crate) fn check_dates(label: &str, effective: Date, maturity: Date) -> CurveResult<()> {
    if maturity <= effective {
        return Err(CurveError::invalid_input(format!(
            "{label}: maturity {maturity} is not after effective date {effective}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_names() {
        assert_eq!("Rate".parse::<QuoteMeasure>().unwrap(), QuoteMeasure::Rate);
        assert_eq!("SwapRate".parse::<QuoteMeasure>().unwrap(), QuoteMeasure::SwapRate);
        assert_eq!("FairPremium".parse::<QuoteMeasure>().unwrap(), QuoteMeasure::ParSpread);
        assert_eq!(" yield ".parse::<QuoteMeasure>().unwrap(), QuoteMeasure::Yield);
        assert!("Vega".parse::<QuoteMeasure>().is_err());
        assert!(!QuoteMeasure::Price.is_rate_like());
        assert_eq!(QuoteMeasure::ForwardRate.to_string(), "ForwardRate");
    }

    #[test]
    fn test_kind_ordering() {
        assert!(InstrumentKind::Deposit < InstrumentKind::Swap);
        assert_eq!(InstrumentKind::CreditDefaultSwap.to_string(), "CDS");
    }
}
