//! Quote bump specifications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Which quotes a bump touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BumpPolicy {
    /// Every quote.
    Parallel,
    /// Only the quote at this instrument index.
    Tenor(usize),
}

/// A signed shift applied to a quote array under a [`BumpPolicy`].
///
/// ```rust
/// use strata_curves::bumping::BumpSpecification;
///
/// let quotes = [0.040, 0.041, 0.042];
/// let up = BumpSpecification::tenor(1, 0.0001).apply(&quotes).unwrap();
/// assert_eq!(up[0], 0.040);
/// assert!((up[1] - 0.0411).abs() < 1e-15);
/// assert_eq!(up[2], 0.042);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BumpSpecification {
    amount: f64,
    policy: BumpPolicy,
}

impl BumpSpecification {
    /// A bump of `amount` under `policy`; the amount must be finite.
    pub fn new(amount: f64, policy: BumpPolicy) -> CurveResult<Self> {
        if !amount.is_finite() {
            return Err(CurveError::invalid_input(format!("bump amount {amount} is not finite")));
        }
        Ok(Self { amount, policy })
    }

    /// Shifts every quote by `amount`.
    #[must_use]
    pub fn parallel(amount: f64) -> Self {
        Self {
            amount,
            policy: BumpPolicy::Parallel,
        }
    }

    /// Shifts only quote `index` by `amount`.
    #[must_use]
    pub fn tenor(index: usize, amount: f64) -> Self {
        Self {
            amount,
            policy: BumpPolicy::Tenor(index),
        }
    }

    /// The signed shift.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The policy.
    pub fn policy(&self) -> BumpPolicy {
        self.policy
    }

    /// The same policy with the opposite sign.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            amount: -self.amount,
            policy: self.policy,
        }
    }

    /// A bumped copy of `quotes`.
    pub fn apply(&self, quotes: &[f64]) -> CurveResult<Vec<f64>> {
        let mut bumped = quotes.to_vec();
        match self.policy {
            BumpPolicy::Parallel => bumped.iter_mut().for_each(|q| *q += self.amount),
            BumpPolicy::Tenor(index) => {
                let quote = bumped.get_mut(index).ok_or_else(|| {
                    CurveError::invalid_input(format!("tenor bump {index} outside {} quotes", quotes.len()))
                })?;
                *quote += self.amount;
            }
        }
        Ok(bumped)
    }
}

impl fmt::Display for BumpSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.policy {
            BumpPolicy::Parallel => write!(f, "parallel {:+.2}bp", self.amount * 1e4),
            BumpPolicy::Tenor(i) => write!(f, "tenor[{i}] {:+.2}bp", self.amount * 1e4),
        }
    }
}
