//! Curve traits consumed by instrument pricing.
//!
//! [`Curve`] is the discounting contract. Index projection and government
//! yields have their own traits so a pricing context can carry each role
//! separately.

use strata_core::{Compounding, Date, Frequency};

use crate::error::CurveResult;

/// A discount curve.
///
/// Times are ACT/365F year fractions from [`reference_date`](Curve::reference_date).
/// Only the discount factor is required; rates are derived from it.
pub trait Curve: Send + Sync {
    /// The curve's reference (valuation) date.
    fn reference_date(&self) -> Date;

    /// Discount factor from the reference date to time `t`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Year fraction from the reference date to `date`, ACT/365F.
    fn year_fraction(&self, date: Date) -> f64 {
        self.reference_date().days_between(&date) as f64 / 365.0
    }

    /// Discount factor for a specific date.
    fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.year_fraction(date))
    }

    /// Zero rate to time `t` under `compounding`.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        if t <= 0.0 {
            return self.instantaneous_forward(0.0);
        }
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Simply compounded forward rate between `t1` and `t2`.
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Ok(0.0);
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        if df2 <= 0.0 {
            return Ok(0.0);
        }
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Instantaneous forward rate `-d ln DF / dt`, by a one-day difference.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        let h = 1.0 / 365.0;
        let df = self.discount_factor(t)?;
        let df_plus = self.discount_factor(t + h)?;
        if df <= 0.0 || df_plus <= 0.0 {
            return Ok(0.0);
        }
        Ok(-(df_plus.ln() - df.ln()) / h)
    }
}

/// Projection of an index forward rate for a fixing time.
pub trait ForwardRateSource: Send + Sync {
    /// Date from which fixing times are measured.
    fn reference_date(&self) -> Date;

    /// Index forward for a fixing `t` years after the reference date.
    fn forward_rate_at(&self, t: f64) -> CurveResult<f64>;

    /// Index forward for a fixing on `date`.
    fn forward_rate_on(&self, date: Date) -> CurveResult<f64> {
        let t = self.reference_date().days_between(&date) as f64 / 365.0;
        self.forward_rate_at(t)
    }
}

/// A government yield curve.
///
/// Discount factors follow from the yields compounded at the curve's
/// frequency, so every govvie curve is also a [`Curve`].
pub trait GovvieYieldSource: Curve {
    /// Compounding frequency of the quoted yields.
    fn frequency(&self) -> Frequency;

    /// Yield to a maturity `t` years after the reference date.
    fn yield_at(&self, t: f64) -> CurveResult<f64>;
}
