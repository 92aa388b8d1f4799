//! Immutable bundles of curves and fixings.
//!
//! A [`MarketState`] is what every pricing call sees: funding, forward,
//! govvie and credit curves plus index fixings. States are never mutated
//! once built; `with_*` returns a new state sharing the untouched curves.
//! [`BumpedMarketStates`] wraps each curve of a bumped family into its own
//! complete state.

use std::sync::Arc;

use strata_core::Date;

use crate::bumping::{BumpedCurveFamily, PARALLEL_BUMP_LABEL};
use crate::context::{Fixings, PricingContext};
use crate::curves::{CreditCurve, FundingCurve, GovvieCurve};
use crate::error::{CurveError, CurveResult};
use crate::traits::{Curve, ForwardRateSource, GovvieYieldSource};

/// Curves and fixings for one pricing scenario.
#[derive(Clone)]
pub struct MarketState {
    valuation_date: Date,
    funding: Option<Arc<dyn Curve>>,
    forward: Option<Arc<dyn ForwardRateSource>>,
    govvie: Option<Arc<dyn GovvieYieldSource>>,
    credit: Option<Arc<CreditCurve>>,
    fixings: Arc<Fixings>,
}

impl MarketState {
    /// Starts a builder at `valuation_date`.
    pub fn builder(valuation_date: Date) -> MarketStateBuilder {
        MarketStateBuilder::new(valuation_date)
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// The funding curve.
    pub fn funding(&self) -> Option<&Arc<dyn Curve>> {
        self.funding.as_ref()
    }

    /// The index forward curve.
    pub fn forward(&self) -> Option<&Arc<dyn ForwardRateSource>> {
        self.forward.as_ref()
    }

    /// The govvie curve.
    pub fn govvie(&self) -> Option<&Arc<dyn GovvieYieldSource>> {
        self.govvie.as_ref()
    }

    /// The credit curve.
    pub fn credit(&self) -> Option<&Arc<CreditCurve>> {
        self.credit.as_ref()
    }

    /// The fixings.
    pub fn fixings(&self) -> &Fixings {
        &self.fixings
    }

    /// A copy with the funding curve replaced.
    #[must_use]
    pub fn with_funding(&self, curve: Arc<dyn Curve>) -> Self {
        Self {
            funding: Some(curve),
            ..self.clone()
        }
    }

    /// A copy with the forward curve replaced.
    #[must_use]
    pub fn with_forward(&self, curve: Arc<dyn ForwardRateSource>) -> Self {
        Self {
            forward: Some(curve),
            ..self.clone()
        }
    }

    /// A copy with the govvie curve replaced.
    #[must_use]
    pub fn with_govvie(&self, curve: Arc<dyn GovvieYieldSource>) -> Self {
        Self {
            govvie: Some(curve),
            ..self.clone()
        }
    }

    /// A copy with the credit curve replaced.
    #[must_use]
    pub fn with_credit(&self, curve: Arc<CreditCurve>) -> Self {
        Self {
            credit: Some(curve),
            ..self.clone()
        }
    }

    /// A borrowed view for pricing.
    pub fn context(&self) -> PricingContext<'_> {
        let mut ctx = PricingContext::new(self.valuation_date).with_fixings(&self.fixings);
        if let Some(curve) = &self.funding {
            ctx = ctx.with_funding(curve.as_ref());
        }
        if let Some(curve) = &self.forward {
            ctx = ctx.with_forward(curve.as_ref());
        }
        if let Some(curve) = &self.govvie {
            ctx = ctx.with_govvie(curve.as_ref());
        }
        if let Some(curve) = &self.credit {
            ctx = ctx.with_credit(curve.as_ref());
        }
        ctx
    }
}

impl std::fmt::Debug for MarketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketState")
            .field("valuation_date", &self.valuation_date)
            .field("funding", &self.funding.is_some())
            .field("forward", &self.forward.is_some())
            .field("govvie", &self.govvie.is_some())
            .field("credit", &self.credit.is_some())
            .field("fixings", &self.fixings.len())
            .finish()
    }
}

/// Assembles a [`MarketState`].
///
/// ```rust
/// use std::sync::Arc;
/// use strata_core::{Currency, Date, Frequency};
/// use strata_curves::market::MarketStateBuilder;
/// use strata_curves::DiscretelyCompoundedFlatRate;
///
/// let today = Date::from_ymd(2025, 3, 3).unwrap();
/// let flat = DiscretelyCompoundedFlatRate::new(today, Currency::USD, 0.04, Frequency::Annual).unwrap();
/// let mut builder = MarketStateBuilder::new(today).funding(Arc::new(flat));
/// builder.set_fixing(today, "USD-3M", 0.043).unwrap();
/// assert!(builder.set_fixing(today, "USD-3M", 0.044).is_err());
/// let state = builder.build();
/// assert_eq!(state.context().fixing(today, "USD-3M"), Some(0.043));
/// ```
#[derive(Clone)]
pub struct MarketStateBuilder {
    valuation_date: Date,
    funding: Option<Arc<dyn Curve>>,
    forward: Option<Arc<dyn ForwardRateSource>>,
    govvie: Option<Arc<dyn GovvieYieldSource>>,
    credit: Option<Arc<CreditCurve>>,
    fixings: Fixings,
}

impl MarketStateBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            funding: None,
            forward: None,
            govvie: None,
            credit: None,
            fixings: Fixings::new(),
        }
    }

    /// Sets the funding curve.
    #[must_use]
    pub fn funding(mut self, curve: Arc<dyn Curve>) -> Self {
        self.funding = Some(curve);
        self
    }

    /// Sets the forward curve.
    #[must_use]
    pub fn forward(mut self, curve: Arc<dyn ForwardRateSource>) -> Self {
        self.forward = Some(curve);
        self
    }

    /// Sets the govvie curve.
    #[must_use]
    pub fn govvie(mut self, curve: Arc<dyn GovvieYieldSource>) -> Self {
        self.govvie = Some(curve);
        self
    }

    /// Sets the credit curve.
    #[must_use]
    pub fn credit(mut self, curve: Arc<CreditCurve>) -> Self {
        self.credit = Some(curve);
        self
    }

    /// Records a fixing; duplicates and non-finite rates are rejected.
    pub fn set_fixing(&mut self, date: Date, label: &str, rate: f64) -> CurveResult<()> {
        if label.is_empty() {
            return Err(CurveError::invalid_input("fixing label is empty"));
        }
        if !rate.is_finite() {
            return Err(CurveError::InvalidQuote { index: 0, value: rate });
        }
        let key = (date, label.to_string());
        if self.fixings.contains_key(&key) {
            return Err(CurveError::DuplicateFixing {
                date,
                label: label.to_string(),
            });
        }
        self.fixings.insert(key, rate);
        Ok(())
    }

    /// Chained form of [`set_fixing`](Self::set_fixing).
    pub fn with_fixing(mut self, date: Date, label: &str, rate: f64) -> CurveResult<Self> {
        self.set_fixing(date, label, rate)?;
        Ok(self)
    }

    /// Freezes the state.
    #[must_use]
    pub fn build(self) -> MarketState {
        MarketState {
            valuation_date: self.valuation_date,
            funding: self.funding,
            forward: self.forward,
            govvie: self.govvie,
            credit: self.credit,
            fixings: Arc::new(self.fixings),
        }
    }
}

/// One complete [`MarketState`] per bumped curve of a family.
#[derive(Debug, Clone)]
pub struct BumpedMarketStates {
    up: Vec<(String, MarketState)>,
    down: Vec<(String, MarketState)>,
    bump: f64,
}

impl BumpedMarketStates {
    /// Wraps every curve of `family` into a copy of `base` with `wrap`.
    pub fn build<C, F>(base: &MarketState, family: &BumpedCurveFamily<C>, wrap: F) -> Self
    where
        F: Fn(&MarketState, Arc<C>) -> MarketState,
    {
        let states = |map: &crate::bumping::BumpedCurveMap<C>| {
            map.iter()
                .map(|(label, curve)| (label.to_string(), wrap(base, Arc::clone(curve))))
                .collect()
        };
        Self {
            up: states(family.up()),
            down: states(family.down()),
            bump: family.bump(),
        }
    }

    /// States with the funding curve bumped.
    pub fn funding(base: &MarketState, family: &BumpedCurveFamily<FundingCurve>) -> Self {
        Self::build(base, family, |state, curve| state.with_funding(curve))
    }

    /// States with the govvie curve bumped.
    pub fn govvie(base: &MarketState, family: &BumpedCurveFamily<GovvieCurve>) -> Self {
        Self::build(base, family, |state, curve| state.with_govvie(curve))
    }

    /// States with the credit curve bumped.
    pub fn credit(base: &MarketState, family: &BumpedCurveFamily<CreditCurve>) -> Self {
        Self::build(base, family, |state, curve| state.with_credit(curve))
    }

    /// Up states in instrument order, parallel last.
    pub fn up(&self) -> &[(String, MarketState)] {
        &self.up
    }

    /// Down states in instrument order, parallel last.
    pub fn down(&self) -> &[(String, MarketState)] {
        &self.down
    }

    /// Bump size in quote units.
    pub fn bump(&self) -> f64 {
        self.bump
    }

    /// The parallel up and down states, if generated.
    pub fn parallel(&self) -> Option<(&MarketState, &MarketState)> {
        fn find(states: &[(String, MarketState)]) -> Option<&MarketState> {
            states
                .iter()
                .find(|(label, _)| label == PARALLEL_BUMP_LABEL)
                .map(|(_, s)| s)
        }
        Some((find(&self.up)?, find(&self.down)?))
    }

    /// Per-tenor `(label, down state, up state)`, parallel excluded.
    pub fn tenors(&self) -> impl Iterator<Item = (&str, &MarketState, &MarketState)> {
        self.up
            .iter()
            .zip(&self.down)
            .filter(|((label, _), _)| label != PARALLEL_BUMP_LABEL)
            .map(|((label, up), (_, down))| (label.as_str(), down, up))
    }
}
