//! Bond terms: coupons, embedded options and principal factors.

use serde::{Deserialize, Serialize};
use strata_core::schedule::backward_schedule;
use strata_core::{Currency, Date, Frequency};

use crate::error::{AnalyticsError, AnalyticsResult};

/// How coupons are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CouponSpec {
    /// A fixed annual rate.
    Fixed {
        /// Annual coupon rate.
        rate: f64,
    },
    /// Index fixing at the start of each period plus a quoted margin.
    Floating {
        /// Label of the index in the fixings.
        index: String,
        /// Margin over the index.
        spread: f64,
    },
}

/// A call or put date with its exercise price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Exercise date.
    pub date: Date,
    /// Exercise price per 100 of outstanding face.
    pub price: f64,
}

impl ExerciseEntry {
    /// Creates an exercise entry.
    #[must_use]
    pub fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }

    /// Price as a fraction of par (e.g., 1.02 for 102).
    #[must_use]
    pub fn price_decimal(&self) -> f64 {
        self.price / 100.0
    }
}

/// Outstanding face from `date` onward, as a fraction of the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalStep {
    /// Date of the principal payment.
    pub date: Date,
    /// Remaining factor after the payment.
    pub factor: f64,
}

/// One coupon period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouponPeriod {
    /// Accrual start.
    pub start: Date,
    /// Accrual end and payment date.
    pub end: Date,
}

impl CouponPeriod {
    /// Length of the period in days.
    #[must_use]
    pub fn days(&self) -> i64 {
        self.start.days_between(&self.end)
    }
}

/// A fixed or floating bond with optional calls, puts and amortization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    label: String,
    currency: Currency,
    issue: Date,
    maturity: Date,
    frequency: Frequency,
    coupon: CouponSpec,
    calls: Vec<ExerciseEntry>,
    puts: Vec<ExerciseEntry>,
    factors: Vec<PrincipalStep>,
}

impl Bond {
    /// Starts a builder.
    pub fn builder(label: impl Into<String>, issue: Date, maturity: Date) -> BondBuilder {
        BondBuilder::new(label, issue, maturity)
    }

    /// Identifier used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Currency of payments.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Issue date, the first accrual start.
    #[must_use]
    pub fn issue(&self) -> Date {
        self.issue
    }

    /// Final maturity.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Coupon terms.
    #[must_use]
    pub fn coupon(&self) -> &CouponSpec {
        &self.coupon
    }

    /// True for index-linked coupons.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self.coupon, CouponSpec::Floating { .. })
    }

    /// Call schedule in date order.
    #[must_use]
    pub fn calls(&self) -> &[ExerciseEntry] {
        &self.calls
    }

    /// Put schedule in date order.
    #[must_use]
    pub fn puts(&self) -> &[ExerciseEntry] {
        &self.puts
    }

    /// Principal factor steps in date order.
    #[must_use]
    pub fn factors(&self) -> &[PrincipalStep] {
        &self.factors
    }

    /// Outstanding factor after all principal payments on or before `date`.
    #[must_use]
    pub fn principal_factor(&self, date: Date) -> f64 {
        self.factors
            .iter()
            .take_while(|step| step.date <= date)
            .last()
            .map_or(1.0, |step| step.factor)
    }

    /// Coupon periods rolled back from maturity.
    pub fn periods(&self) -> AnalyticsResult<Vec<CouponPeriod>> {
        let dates = backward_schedule(self.issue, self.maturity, self.frequency.months_per_period())?;
        Ok(dates
            .windows(2)
            .map(|w| CouponPeriod { start: w[0], end: w[1] })
            .collect())
    }

    /// The period accruing on `date`, i.e. with `start <= date < end`.
    pub fn period_containing(&self, date: Date) -> AnalyticsResult<Option<CouponPeriod>> {
        Ok(self.periods()?.into_iter().find(|p| p.start <= date && date < p.end))
    }
}

/// Builder for [`Bond`].
///
/// # Example
///
/// ```rust
/// use strata_analytics::bond::Bond;
/// use strata_core::{Date, Frequency};
///
/// let issue = Date::from_ymd(2025, 1, 17).unwrap();
/// let maturity = Date::from_ymd(2035, 1, 17).unwrap();
/// let bond = Bond::builder("ACME 4.5 2035", issue, maturity)
///     .fixed(0.045)
///     .frequency(Frequency::SemiAnnual)
///     .call(Date::from_ymd(2030, 1, 17).unwrap(), 101.0)
///     .build()
///     .unwrap();
/// assert_eq!(bond.periods().unwrap().len(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct BondBuilder {
    label: String,
    currency: Currency,
    issue: Date,
    maturity: Date,
    frequency: Frequency,
    coupon: Option<CouponSpec>,
    calls: Vec<ExerciseEntry>,
    puts: Vec<ExerciseEntry>,
    factors: Vec<PrincipalStep>,
}

impl BondBuilder {
    /// A USD semi-annual bond with no coupon set yet.
    pub fn new(label: impl Into<String>, issue: Date, maturity: Date) -> Self {
        Self {
            label: label.into(),
            currency: Currency::USD,
            issue,
            maturity,
            frequency: Frequency::SemiAnnual,
            coupon: None,
            calls: Vec::new(),
            puts: Vec::new(),
            factors: Vec::new(),
        }
    }

    /// Sets the payment currency.
    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the coupon frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Fixed annual coupon.
    #[must_use]
    pub fn fixed(mut self, rate: f64) -> Self {
        self.coupon = Some(CouponSpec::Fixed { rate });
        self
    }

    /// Floating coupon on `index` plus `spread`.
    #[must_use]
    pub fn floating(mut self, index: impl Into<String>, spread: f64) -> Self {
        self.coupon = Some(CouponSpec::Floating {
            index: index.into(),
            spread,
        });
        self
    }

    /// Adds a call date at `price` per 100.
    #[must_use]
    pub fn call(mut self, date: Date, price: f64) -> Self {
        self.calls.push(ExerciseEntry::new(date, price));
        self
    }

    /// Adds a put date at `price` per 100.
    #[must_use]
    pub fn put(mut self, date: Date, price: f64) -> Self {
        self.puts.push(ExerciseEntry::new(date, price));
        self
    }

    /// Steps the outstanding factor down to `factor` on `date`.
    #[must_use]
    pub fn amortize(mut self, date: Date, factor: f64) -> Self {
        self.factors.push(PrincipalStep { date, factor });
        self
    }

    /// Validates and builds the bond.
    pub fn build(mut self) -> AnalyticsResult<Bond> {
        let label = self.label;
        if self.maturity <= self.issue {
            return Err(AnalyticsError::invalid_input(format!(
                "{label}: maturity {} is not after issue {}",
                self.maturity, self.issue
            )));
        }
        let coupon = self
            .coupon
            .ok_or_else(|| AnalyticsError::invalid_input(format!("{label}: no coupon terms")))?;
        match &coupon {
            CouponSpec::Fixed { rate } if !rate.is_finite() || *rate < 0.0 => {
                return Err(AnalyticsError::invalid_input(format!("{label}: coupon {rate} is invalid")));
            }
            CouponSpec::Floating { index, spread } if index.is_empty() || !spread.is_finite() => {
                return Err(AnalyticsError::invalid_input(format!(
                    "{label}: floating terms '{index}' + {spread} are invalid"
                )));
            }
            _ => {}
        }

        for entries in [&mut self.calls, &mut self.puts] {
            entries.sort_by_key(|e| e.date);
            for entry in entries.iter() {
                if entry.date <= self.issue || entry.date > self.maturity {
                    return Err(AnalyticsError::invalid_input(format!(
                        "{label}: exercise date {} outside the bond's life",
                        entry.date
                    )));
                }
                if !(entry.price.is_finite() && entry.price > 0.0) {
                    return Err(AnalyticsError::invalid_input(format!(
                        "{label}: exercise price {} is not positive",
                        entry.price
                    )));
                }
            }
        }

        self.factors.sort_by_key(|s| s.date);
        let mut previous = 1.0;
        for step in &self.factors {
            if step.date <= self.issue || step.date >= self.maturity {
                return Err(AnalyticsError::invalid_input(format!(
                    "{label}: principal step on {} outside the bond's life",
                    step.date
                )));
            }
            if !(step.factor > 0.0 && step.factor <= previous) {
                return Err(AnalyticsError::invalid_input(format!(
                    "{label}: factor {} on {} must lie in (0, {previous}]",
                    step.factor, step.date
                )));
            }
            previous = step.factor;
        }

        Ok(Bond {
            label,
            currency: self.currency,
            issue: self.issue,
            maturity: self.maturity,
            frequency: self.frequency,
            coupon,
            calls: self.calls,
            puts: self.puts,
            factors: self.factors,
        })
    }
}
