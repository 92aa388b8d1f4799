//! Families of recalibrated curves keyed by tenor label.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{CurveError, CurveResult};

/// Label of the parallel entry in a [`BumpedCurveMap`].
pub const PARALLEL_BUMP_LABEL: &str = "bump";

/// Bumped curves in instrument order, plus an optional parallel entry.
///
/// Labels are unique. The map is built whole or not at all.
#[derive(Debug)]
pub struct BumpedCurveMap<C> {
    entries: Vec<(String, Arc<C>)>,
}

impl<C> BumpedCurveMap<C> {
    /// Wraps `entries`, rejecting duplicate or empty labels.
    pub fn new(entries: Vec<(String, Arc<C>)>) -> CurveResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for (label, _) in &entries {
            if label.is_empty() || !seen.insert(label.as_str()) {
                return Err(CurveError::duplicate_label(label.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The curve for `label`.
    pub fn get(&self, label: &str) -> Option<&Arc<C>> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, c)| c)
    }

    /// The parallel entry, if generated.
    pub fn parallel(&self) -> Option<&Arc<C>> {
        self.get(PARALLEL_BUMP_LABEL)
    }

    /// Every entry in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<C>)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), c))
    }

    /// Per-tenor entries, without the parallel one.
    pub fn tenors(&self) -> impl Iterator<Item = (&str, &Arc<C>)> {
        self.iter().filter(|(l, _)| *l != PARALLEL_BUMP_LABEL)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    /// Number of entries, parallel included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Clone for BumpedCurveMap<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// A base curve with its up and down bumped maps.
#[derive(Debug)]
pub struct BumpedCurveFamily<C> {
    base: Arc<C>,
    up: BumpedCurveMap<C>,
    down: BumpedCurveMap<C>,
    bump: f64,
}

impl<C> BumpedCurveFamily<C> {
    /// Assembles a family; both maps must carry the same labels in the same order.
    pub fn new(base: Arc<C>, up: BumpedCurveMap<C>, down: BumpedCurveMap<C>, bump: f64) -> CurveResult<Self> {
        if up.labels() != down.labels() {
            return Err(CurveError::invalid_input("up and down bump maps carry different labels"));
        }
        if !(bump.is_finite() && bump > 0.0) {
            return Err(CurveError::invalid_input(format!("bump size {bump} is not positive")));
        }
        Ok(Self { base, up, down, bump })
    }

    /// The unbumped curve.
    pub fn base(&self) -> &Arc<C> {
        &self.base
    }

    /// Curves with quotes shifted up.
    pub fn up(&self) -> &BumpedCurveMap<C> {
        &self.up
    }

    /// Curves with quotes shifted down.
    pub fn down(&self) -> &BumpedCurveMap<C> {
        &self.down
    }

    /// Absolute bump size in quote units.
    pub fn bump(&self) -> f64 {
        self.bump
    }

    /// Tenor labels in instrument order.
    pub fn tenor_labels(&self) -> Vec<&str> {
        self.up.tenors().map(|(l, _)| l).collect()
    }

    /// Central difference `0.5 (f(down) - f(up)) / bump` of `f` for every
    /// tenor entry, in instrument order.
    pub fn central_differences<F>(&self, f: F) -> CurveResult<Vec<(String, f64)>>
    where
        F: Fn(&C) -> CurveResult<f64>,
    {
        self.up
            .tenors()
            .zip(self.down.tenors())
            .map(|((label, up), (_, down))| Ok((label.to_string(), 0.5 * (f(down)? - f(up)?) / self.bump)))
            .collect()
    }
}

impl<C> Clone for BumpedCurveFamily<C> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            up: self.up.clone(),
            down: self.down.clone(),
            bump: self.bump,
        }
    }
}
