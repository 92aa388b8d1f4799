//! Bond replication: a named-field report of yields, spreads, durations and
//! key-rate sensitivities for one bond under one market snapshot.
//!
//! [`BondReplicator::new`] calibrates the base curves and every bumped
//! family once. [`BondReplicator::generate_run`] only reads them, so two
//! runs on the same replicator produce identical reports.
//!
//! Key-rate durations are central differences over recalibrated curves:
//!
//! ```text
//! KRD(tenor) = 0.5 × (P(down) - P(up)) / P(base) / bump
//! ```

use std::sync::Arc;

use strata_config::{BumpConfig, ReplicationConfig, Validate};
use strata_core::{Compounding, Date};
use strata_curves::bumping::{
    CreditCalibration, ForwardFundingCalibration, FundingCalibration, GovvieCalibration, ScenarioGenerator,
};
use strata_curves::cashflows::{price_from_curve, spread_from_price, yield_from_price};
use strata_curves::market::{BumpedMarketStates, MarketState, MarketStateBuilder};
use strata_curves::{CreditCurve, Curve, ForwardRateSource, GovvieYieldSource};
use strata_math::solvers::SolverConfig;

use crate::bond::Bond;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::{
    accrued, cash_flows, convexity, credit_basis, credit_risky_price, effective_duration, flows_to_workout,
    macaulay_duration, modified_duration, weighted_average_life, BondFlow,
};
use crate::report::{BondReplicationRun, FieldValue, TenorValues};
use crate::workout::{resolve_workout, Workout, WorkoutKind};

/// Report field names.
pub mod fields {
    /// Workout redemption date.
    pub const WORKOUT_DATE: &str = "Workout Date";
    /// Workout redemption price as a fraction of par.
    pub const WORKOUT_FACTOR: &str = "Workout Factor";
    /// Accrued interest per 100.
    pub const ACCRUED: &str = "Accrued";
    /// Market clean price per 100.
    pub const CLEAN_PRICE: &str = "Clean Price";
    /// Clean price plus accrued.
    pub const DIRTY_PRICE: &str = "Dirty Price";
    /// Yield of the dirty price to the workout.
    pub const YIELD_TO_WORKOUT: &str = "Yield To Workout";
    /// Yield of the dirty price to final maturity.
    pub const YIELD_TO_MATURITY: &str = "Yield To Maturity";
    /// Macaulay duration to workout.
    pub const MACAULAY_DURATION: &str = "Macaulay Duration";
    /// Modified duration to workout.
    pub const MODIFIED_DURATION: &str = "Modified Duration";
    /// Effective duration for a parallel yield bump.
    pub const EFFECTIVE_DURATION: &str = "Effective Duration";
    /// Effective convexity for a parallel yield bump.
    pub const CONVEXITY: &str = "Convexity";
    /// Weighted average life to workout.
    pub const WAL: &str = "WAL";
    /// Continuous spread over the funding curve.
    pub const Z_SPREAD: &str = "Z Spread";
    /// Yield less the funding zero rate at the workout.
    pub const I_SPREAD: &str = "I Spread";
    /// Yield less the govvie yield at the workout.
    pub const G_SPREAD: &str = "G Spread";
    /// Continuous spread over the govvie curve.
    pub const GOVVIE_Z_SPREAD: &str = "Govvie Z Spread";
    /// Duration to a parallel bump of every funding quote.
    pub const FUNDING_PARALLEL_DURATION: &str = "Funding Parallel Duration";
    /// Funding key-rate durations.
    pub const FUNDING_KRD: &str = "Funding KRD";
    /// Funding key-rate price change per 100 per basis point.
    pub const FUNDING_KPRD: &str = "Funding KPRD";
    /// Effective duration over the sum of funding key-rate durations.
    pub const OAD_MULT: &str = "OAD MULT";
    /// Key-rate durations of the forward-funding refit.
    pub const FORWARD_FUNDING_KRD: &str = "Forward Funding KRD";
    /// Govvie key-rate durations.
    pub const GOVVIE_KRD: &str = "Govvie KRD";
    /// Hazard shift that reprices the bond off the credit curve.
    pub const CREDIT_BASIS: &str = "Credit Basis";
    /// Credit-risky model price per 100 before the basis.
    pub const CREDIT_RISKY_PRICE: &str = "Credit Risky Price";
    /// Credit key-rate durations, basis held.
    pub const CREDIT_KRD: &str = "Credit KRD";
    /// Parallel funding duration on a flat hazard implied from the dirty price.
    pub const CREDIT_ADJUSTED_EFFECTIVE_DURATION: &str = "Credit Adjusted Effective Duration";
}

/// Builder for [`BondReplicator`].
pub struct BondReplicatorBuilder {
    bond: Bond,
    settlement: Date,
    clean_price: f64,
    funding: FundingCalibration,
    forward_funding: Option<ForwardFundingCalibration>,
    govvie: Option<GovvieCalibration>,
    credit: Option<CreditCalibration>,
    forward: Option<Arc<dyn ForwardRateSource>>,
    fixings: Vec<(Date, String, f64)>,
    bumping: BumpConfig,
    config: ReplicationConfig,
}

impl BondReplicatorBuilder {
    /// Adds the forward-funding family.
    #[must_use]
    pub fn forward_funding(mut self, calibration: ForwardFundingCalibration) -> Self {
        self.forward_funding = Some(calibration);
        self
    }

    /// Adds the govvie family.
    #[must_use]
    pub fn govvie(mut self, calibration: GovvieCalibration) -> Self {
        self.govvie = Some(calibration);
        self
    }

    /// Adds the credit family.
    #[must_use]
    pub fn credit(mut self, calibration: CreditCalibration) -> Self {
        self.credit = Some(calibration);
        self
    }

    /// Projects floating coupons off `source` instead of the funding curve.
    #[must_use]
    pub fn forward(mut self, source: Arc<dyn ForwardRateSource>) -> Self {
        self.forward = Some(source);
        self
    }

    /// Adds an index fixing.
    #[must_use]
    pub fn fixing(mut self, date: Date, index: impl Into<String>, rate: f64) -> Self {
        self.fixings.push((date, index.into(), rate));
        self
    }

    /// Replaces the bump settings.
    #[must_use]
    pub fn bumping(mut self, bumping: BumpConfig) -> Self {
        self.bumping = bumping;
        self
    }

    /// Replaces the replication settings.
    #[must_use]
    pub fn config(mut self, config: ReplicationConfig) -> Self {
        self.config = config;
        self
    }

    /// Calibrates every family and builds the replicator.
    pub fn build(self) -> AnalyticsResult<BondReplicator> {
        BondReplicator::new(self)
    }
}

/// Base and bumped market states for one bond, ready for replication runs.
#[derive(Debug, Clone)]
pub struct BondReplicator {
    bond: Bond,
    settlement: Date,
    clean_price: f64,
    config: ReplicationConfig,
    base: MarketState,
    funding: BumpedMarketStates,
    forward_funding: Option<BumpedMarketStates>,
    govvie: Option<BumpedMarketStates>,
    credit: Option<BumpedMarketStates>,
}

impl BondReplicator {
    /// Starts a replicator for `bond` quoted at `clean_price` per 100.
    pub fn builder(bond: Bond, settlement: Date, clean_price: f64, funding: FundingCalibration) -> BondReplicatorBuilder {
        BondReplicatorBuilder {
            bond,
            settlement,
            clean_price,
            funding,
            forward_funding: None,
            govvie: None,
            credit: None,
            forward: None,
            fixings: Vec::new(),
            bumping: BumpConfig::standard(),
            config: ReplicationConfig::default(),
        }
    }

    /// Calibrates the base curves and all bumped families.
    ///
    /// Fails if any family cannot be built in full.
    pub fn new(inputs: BondReplicatorBuilder) -> AnalyticsResult<Self> {
        inputs.bumping.validate_or_error()?;
        inputs.config.validate_or_error()?;
        if !(inputs.clean_price.is_finite() && inputs.clean_price > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "clean price {} is not positive",
                inputs.clean_price
            )));
        }
        if inputs.settlement >= inputs.bond.maturity() {
            return Err(AnalyticsError::invalid_input(format!(
                "{}: settlement {} is not before maturity",
                inputs.bond.label(),
                inputs.settlement
            )));
        }

        let generator = ScenarioGenerator::new(inputs.bumping);
        log::info!("Building replication families for {}", inputs.bond.label());
        let funding_family = generator.generate(&inputs.funding)?;
        let valuation_date = funding_family.base().reference_date();

        let mut builder = MarketStateBuilder::new(valuation_date).funding(Arc::clone(funding_family.base()) as Arc<dyn Curve>);
        let govvie_family = inputs.govvie.as_ref().map(|g| generator.generate(g)).transpose()?;
        if let Some(family) = &govvie_family {
            builder = builder.govvie(Arc::clone(family.base()) as Arc<dyn GovvieYieldSource>);
        }
        let credit_family = inputs.credit.as_ref().map(|c| generator.generate(c)).transpose()?;
        if let Some(family) = &credit_family {
            builder = builder.credit(Arc::clone(family.base()));
        }
        if let Some(source) = inputs.forward {
            builder = builder.forward(source);
        }
        for (date, index, rate) in &inputs.fixings {
            builder.set_fixing(*date, index, *rate)?;
        }
        let base = builder.build();

        let forward_funding = inputs
            .forward_funding
            .as_ref()
            .map(|f| generator.generate(f))
            .transpose()?
            .map(|family| BumpedMarketStates::funding(&base, &family));

        Ok(Self {
            funding: BumpedMarketStates::funding(&base, &funding_family),
            forward_funding,
            govvie: govvie_family.map(|family| BumpedMarketStates::govvie(&base, &family)),
            credit: credit_family.map(|family| BumpedMarketStates::credit(&base, &family)),
            bond: inputs.bond,
            settlement: inputs.settlement,
            clean_price: inputs.clean_price,
            config: inputs.config,
            base,
        })
    }

    /// The bond.
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// Settlement date.
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Unbumped market state.
    pub fn base_state(&self) -> &MarketState {
        &self.base
    }

    /// Funding-bumped states.
    pub fn funding_states(&self) -> &BumpedMarketStates {
        &self.funding
    }

    /// Govvie-bumped states, if a govvie family was supplied.
    pub fn govvie_states(&self) -> Option<&BumpedMarketStates> {
        self.govvie.as_ref()
    }

    /// Credit-bumped states, if a credit family was supplied.
    pub fn credit_states(&self) -> Option<&BumpedMarketStates> {
        self.credit.as_ref()
    }

    fn solver(&self) -> SolverConfig {
        SolverConfig::new(self.config.yield_tolerance, 200)
    }

    fn flows(&self, state: &MarketState, workout: &Workout) -> AnalyticsResult<Vec<BondFlow>> {
        flows_to_workout(&self.bond, self.settlement, workout.date, workout.factor, &state.context())
    }

    fn funding_price(&self, state: &MarketState, workout: &Workout, z: f64) -> AnalyticsResult<f64> {
        let flows = cash_flows(&self.flows(state, workout)?);
        Ok(price_from_curve(&flows, self.settlement, state.context().funding()?, z)?)
    }

    fn govvie_price(&self, state: &MarketState, workout: &Workout, z: f64) -> AnalyticsResult<f64> {
        let flows = cash_flows(&self.flows(state, workout)?);
        Ok(price_from_curve(&flows, self.settlement, state.context().govvie()?, z)?)
    }

    fn risky_price(&self, state: &MarketState, workout: &Workout, basis: f64) -> AnalyticsResult<f64> {
        let ctx = state.context();
        let credit = ctx.credit()?.shifted(basis);
        credit_risky_price(&self.flows(state, workout)?, self.settlement, ctx.funding()?, &credit)
    }

    /// Computes the report.
    ///
    /// Fails only if a mandatory field (workout, accrued, prices, yield to
    /// workout) cannot be computed. Every other field that fails is left
    /// out and recorded as a diagnostic.
    pub fn generate_run(&self) -> AnalyticsResult<BondReplicationRun> {
        use fields::*;

        let ctx = self.base.context();
        let solver = self.solver();
        let mut run = BondReplicationRun::new();

        let accrued = accrued(&self.bond, self.settlement, &ctx).map_err(|e| AnalyticsError::mandatory(ACCRUED, &e))?;
        let dirty = self.clean_price / 100.0 + accrued;
        let workout = resolve_workout(&self.bond, self.settlement, dirty, &ctx, &solver)
            .map_err(|e| AnalyticsError::mandatory(WORKOUT_DATE, &e))?;
        let flows = self
            .flows(&self.base, &workout)
            .map_err(|e| AnalyticsError::mandatory(YIELD_TO_WORKOUT, &e))?;
        let cfs = cash_flows(&flows);
        let y = workout.yield_to_workout;
        let frequency = self.bond.frequency();

        run.insert(WORKOUT_DATE, FieldValue::Date(workout.date))?;
        run.insert(WORKOUT_FACTOR, FieldValue::Scalar(workout.factor))?;
        run.insert(ACCRUED, FieldValue::Scalar(100.0 * accrued))?;
        run.insert(CLEAN_PRICE, FieldValue::Scalar(self.clean_price))?;
        run.insert(DIRTY_PRICE, FieldValue::Scalar(100.0 * dirty))?;
        run.insert(YIELD_TO_WORKOUT, FieldValue::Scalar(y))?;

        // yield measures
        optional(&mut run, YIELD_TO_MATURITY, || {
            if workout.kind == WorkoutKind::Maturity {
                return Ok(FieldValue::Scalar(y));
            }
            let to_maturity = cash_flows(&flows_to_workout(&self.bond, self.settlement, self.bond.maturity(), 1.0, &ctx)?);
            Ok(FieldValue::Scalar(yield_from_price(&to_maturity, self.settlement, dirty, frequency, &solver)?))
        })?;
        let yield_bump = self.config.effective_duration_bump_bp * 1e-4;
        optional(&mut run, MACAULAY_DURATION, || {
            Ok(FieldValue::Scalar(macaulay_duration(&cfs, self.settlement, y, frequency)?))
        })?;
        optional(&mut run, MODIFIED_DURATION, || {
            Ok(FieldValue::Scalar(modified_duration(&cfs, self.settlement, y, frequency)?))
        })?;
        let effective = effective_duration(&cfs, self.settlement, y, frequency, yield_bump);
        optional(&mut run, EFFECTIVE_DURATION, || Ok(FieldValue::Scalar(effective.clone()?)))?;
        optional(&mut run, CONVEXITY, || {
            Ok(FieldValue::Scalar(convexity(&cfs, self.settlement, y, frequency, yield_bump)?))
        })?;
        match weighted_average_life(&flows, self.settlement) {
            Ok(wal) => run.insert(WAL, FieldValue::Scalar(wal))?,
            Err(e) => {
                run.record(WAL, e.to_string());
                run.insert(WAL, FieldValue::Scalar(0.0))?;
            }
        }

        // funding
        let workout_time = ctx.funding()?.year_fraction(workout.date);
        optional(&mut run, I_SPREAD, || {
            let zero = ctx.funding()?.zero_rate(workout_time, Compounding::from(frequency))?;
            Ok(FieldValue::Scalar(y - zero))
        })?;
        let z = spread_from_price(&cfs, self.settlement, ctx.funding()?, dirty, &solver).map_err(AnalyticsError::from);
        optional(&mut run, Z_SPREAD, || Ok(FieldValue::Scalar(z.clone()?)))?;
        if let Ok(z) = z {
            // floaters measure against the level price, fixed bonds against the z-spread reprice
            let reference = if self.bond.is_floating() {
                dirty
            } else {
                self.funding_price(&self.base, &workout, z).unwrap_or(dirty)
            };
            let price = |state: &MarketState| self.funding_price(state, &workout, z);
            optional(&mut run, FUNDING_PARALLEL_DURATION, || {
                Ok(FieldValue::Scalar(parallel_duration(&self.funding, reference, price)?))
            })?;
            let krd = key_rate_durations(&self.funding, reference, price);
            optional(&mut run, FUNDING_KRD, || Ok(FieldValue::TenorMap(krd.clone()?)))?;
            optional(&mut run, FUNDING_KPRD, || {
                Ok(FieldValue::TenorMap(key_rate_price_changes(&self.funding, price)?))
            })?;
            optional(&mut run, OAD_MULT, || {
                let sum = tenor_sum(&krd.clone()?);
                if sum.abs() < 1e-12 {
                    return Err(AnalyticsError::KeyRateDurationFailed("key-rate durations sum to zero".into()));
                }
                Ok(FieldValue::Scalar(effective.clone()? / sum))
            })?;
            optional(&mut run, CREDIT_ADJUSTED_EFFECTIVE_DURATION, || {
                Ok(FieldValue::Scalar(self.credit_adjusted_duration(&workout, &flows, dirty, &solver)?))
            })?;
            if let Some(states) = &self.forward_funding {
                optional(&mut run, FORWARD_FUNDING_KRD, || {
                    Ok(FieldValue::TenorMap(key_rate_durations(states, reference, price)?))
                })?;
            }
        } else {
            run.record(FUNDING_KRD, "no z-spread over the funding curve");
        }

        // govvie
        if let Some(states) = &self.govvie {
            let govvie = ctx.govvie()?;
            optional(&mut run, G_SPREAD, || {
                Ok(FieldValue::Scalar(y - govvie.yield_at(govvie.year_fraction(workout.date))?))
            })?;
            match spread_from_price(&cfs, self.settlement, govvie, dirty, &solver) {
                Ok(zg) => {
                    run.insert(GOVVIE_Z_SPREAD, FieldValue::Scalar(zg))?;
                    let reference = self.govvie_price(&self.base, &workout, zg).unwrap_or(dirty);
                    optional(&mut run, GOVVIE_KRD, || {
                        let price = |state: &MarketState| self.govvie_price(state, &workout, zg);
                        Ok(FieldValue::TenorMap(key_rate_durations(states, reference, price)?))
                    })?;
                }
                Err(e) => run.record(GOVVIE_Z_SPREAD, e.to_string()),
            }
        } else {
            log::debug!("{}: no govvie curve, govvie fields skipped", self.bond.label());
        }

        // credit
        if let Some(states) = &self.credit {
            self.credit_fields(&mut run, states, &workout, &flows, dirty, &solver)?;
        } else {
            log::debug!("{}: no credit curve, credit fields skipped", self.bond.label());
        }

        log::debug!(
            "{}: {} fields, {} diagnostics",
            self.bond.label(),
            run.fields().len(),
            run.diagnostics().len()
        );
        Ok(run)
    }

    fn credit_fields(
        &self,
        run: &mut BondReplicationRun,
        states: &BumpedMarketStates,
        workout: &Workout,
        flows: &[BondFlow],
        dirty: f64,
        solver: &SolverConfig,
    ) -> AnalyticsResult<()> {
        use fields::*;

        let ctx = self.base.context();
        let (funding, credit) = (ctx.funding()?, ctx.credit()?);
        optional(run, CREDIT_RISKY_PRICE, || {
            Ok(FieldValue::Scalar(100.0 * credit_risky_price(flows, self.settlement, funding, credit)?))
        })?;
        let basis = match credit_basis(flows, self.settlement, funding, credit, dirty, solver) {
            Ok(basis) => basis,
            Err(e) => {
                run.record(CREDIT_BASIS, e.to_string());
                return Ok(());
            }
        };
        run.insert(CREDIT_BASIS, FieldValue::Scalar(basis))?;
        let price = |state: &MarketState| self.risky_price(state, workout, basis);
        optional(run, CREDIT_KRD, || Ok(FieldValue::TenorMap(key_rate_durations(states, dirty, price)?)))
    }

    /// Parallel funding duration of the price on a flat hazard implied from
    /// `dirty` at the configured recovery, hazard held.
    fn credit_adjusted_duration(
        &self,
        workout: &Workout,
        flows: &[BondFlow],
        dirty: f64,
        solver: &SolverConfig,
    ) -> AnalyticsResult<f64> {
        let ctx = self.base.context();
        let flat = CreditCurve::flat(self.base.valuation_date(), 0.0, self.config.recovery_rate)?;
        let hazard = credit_basis(flows, self.settlement, ctx.funding()?, &flat, dirty, solver)?;
        let implied = flat.shifted(hazard);
        parallel_duration(&self.funding, dirty, |state: &MarketState| {
            credit_risky_price(&self.flows(state, workout)?, self.settlement, state.context().funding()?, &implied)
        })
    }
}

fn optional<F>(run: &mut BondReplicationRun, name: &str, compute: F) -> AnalyticsResult<()>
where
    F: FnOnce() -> AnalyticsResult<FieldValue>,
{
    match compute() {
        Ok(value) => run.insert(name, value),
        Err(e) => {
            run.record(name, e.to_string());
            Ok(())
        }
    }
}

fn central_difference(down: f64, up: f64, base: f64, bump: f64) -> AnalyticsResult<f64> {
    if base.abs() < 1e-10 {
        return Err(AnalyticsError::KeyRateDurationFailed("base price is zero".into()));
    }
    Ok(0.5 * (down - up) / base / bump)
}

/// `0.5 × (P(down) - P(up)) / base / bump` per tenor, in tenor order.
pub fn key_rate_durations<F>(states: &BumpedMarketStates, base: f64, price: F) -> AnalyticsResult<TenorValues>
where
    F: Fn(&MarketState) -> AnalyticsResult<f64>,
{
    states
        .tenors()
        .map(|(label, down, up)| {
            let krd = central_difference(price(down)?, price(up)?, base, states.bump())?;
            Ok((label.to_string(), krd))
        })
        .collect()
}

/// Price change per 100 face for a one basis point move of each tenor.
pub fn key_rate_price_changes<F>(states: &BumpedMarketStates, price: F) -> AnalyticsResult<TenorValues>
where
    F: Fn(&MarketState) -> AnalyticsResult<f64>,
{
    let per_bp = 1e-4 / states.bump();
    states
        .tenors()
        .map(|(label, down, up)| Ok((label.to_string(), 50.0 * (price(down)? - price(up)?) * per_bp)))
        .collect()
}

/// Central difference over the parallel (`"bump"`) states.
pub fn parallel_duration<F>(states: &BumpedMarketStates, base: f64, price: F) -> AnalyticsResult<f64>
where
    F: Fn(&MarketState) -> AnalyticsResult<f64>,
{
    let (up, down) = states
        .parallel()
        .ok_or_else(|| AnalyticsError::KeyRateDurationFailed("no parallel bump was generated".into()))?;
    central_difference(price(down)?, price(up)?, base, states.bump())
}

/// Sum of a tenor map.
#[must_use]
pub fn tenor_sum(values: &[(String, f64)]) -> f64 {
    values.iter().map(|(_, v)| v).sum()
}
