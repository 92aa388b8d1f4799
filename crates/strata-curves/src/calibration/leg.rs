//! Instruments bound to their target quotes.

use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::instruments::{CalibrationInstrument, QuoteMeasure};

/// An ordered run of instruments with one quote and measure each.
#[derive(Debug, Clone)]
pub struct CalibrationLeg {
    instruments: Vec<Arc<dyn CalibrationInstrument>>,
    quotes: Vec<f64>,
    measures: Vec<QuoteMeasure>,
}

impl CalibrationLeg {
    /// Binds instruments, quotes and measures; all three must have the same
    /// non-zero length and every quote must be finite.
    pub fn new(
        instruments: Vec<Arc<dyn CalibrationInstrument>>,
        quotes: Vec<f64>,
        measures: Vec<QuoteMeasure>,
    ) -> CurveResult<Self> {
        if instruments.is_empty() {
            return Err(CurveError::invalid_input("calibration leg has no instruments"));
        }
        if quotes.len() != instruments.len() || measures.len() != instruments.len() {
            return Err(CurveError::invalid_input(format!(
                "{} instruments, {} quotes and {} measures",
                instruments.len(),
                quotes.len(),
                measures.len()
            )));
        }
        if let Some((index, &value)) = quotes.iter().enumerate().find(|(_, q)| !q.is_finite()) {
            return Err(CurveError::InvalidQuote { index, value });
        }
        Ok(Self {
            instruments,
            quotes,
            measures,
        })
    }

    /// Same as [`new`](Self::new) with one measure for every instrument.
    pub fn uniform(
        instruments: Vec<Arc<dyn CalibrationInstrument>>,
        quotes: Vec<f64>,
        measure: QuoteMeasure,
    ) -> CurveResult<Self> {
        let measures = vec![measure; instruments.len()];
        Self::new(instruments, quotes, measures)
    }

    /// Same as [`new`](Self::new) with measures given by name ("Rate", "SwapRate", ...).
    pub fn from_measure_names(
        instruments: Vec<Arc<dyn CalibrationInstrument>>,
        quotes: Vec<f64>,
        names: &[&str],
    ) -> CurveResult<Self> {
        let measures = names
            .iter()
            .map(|name| name.parse())
            .collect::<CurveResult<Vec<QuoteMeasure>>>()?;
        Self::new(instruments, quotes, measures)
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Always false; a leg holds at least one instrument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// The instruments.
    #[must_use]
    pub fn instruments(&self) -> &[Arc<dyn CalibrationInstrument>] {
        &self.instruments
    }

    /// Target quotes.
    #[must_use]
    pub fn quotes(&self) -> &[f64] {
        &self.quotes
    }

    /// Quoted measures.
    #[must_use]
    pub fn measures(&self) -> &[QuoteMeasure] {
        &self.measures
    }

    /// The same instruments with replacement quotes.
    pub fn with_quotes(&self, quotes: Vec<f64>) -> CurveResult<Self> {
        Self::new(self.instruments.clone(), quotes, self.measures.clone())
    }

    /// `(instrument, quote, measure)` triples in order.
    pub fn iter(&self) -> impl Iterator<Item = (&dyn CalibrationInstrument, f64, QuoteMeasure)> + '_ {
        self.instruments
            .iter()
            .zip(&self.quotes)
            .zip(&self.measures)
            .map(|((inst, &q), &m)| (inst.as_ref(), q, m))
    }
}
