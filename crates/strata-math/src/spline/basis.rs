//! Segment basis function families.
//!
//! Every basis is expressed in the segment-local coordinate `u ∈ [0, 1]`.
//! The tension families keep `{1, u}` and add a pair of shape functions
//! whose stiffness grows with the tension parameter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Basis spanning one spline segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentBasis {
    /// Monomials `u^0 .. u^degree`.
    Polynomial {
        /// Polynomial degree (3 for cubic, 4 for quartic).
        degree: usize,
    },
    /// Kaklis-Pandelis polynomial tension: `{1, u, (1-u)^p, u^p}`.
    KaklisPandelis {
        /// Exponent `p`, at least 3.
        exponent: i32,
    },
    /// KLK exponential tension: `{1, u, e^{-τu}, e^{-τ(1-u)}}`.
    ExponentialTension {
        /// Tension `τ > 0`.
        tension: f64,
    },
    /// KLK hyperbolic tension: `{1, u, cosh τu, sinh τu}`.
    HyperbolicTension {
        /// Tension `τ > 0`.
        tension: f64,
    },
    /// KLK rational linear tension: `{1, u, (1-u)³/(1+τu), u³/(1+τ(1-u))}`.
    RationalLinearTension {
        /// Tension `τ >= 0`.
        tension: f64,
    },
    /// KLK rational quadratic tension: `{1, u, (1-u)³/(1+τu(1-u)), u³/(1+τu(1-u))}`.
    RationalQuadraticTension {
        /// Tension `τ >= 0`.
        tension: f64,
    },
}

impl Default for SegmentBasis {
    fn default() -> Self {
        Self::cubic()
    }
}

impl SegmentBasis {
    /// Linear polynomial basis.
    #[must_use]
    pub const fn linear() -> Self {
        Self::Polynomial { degree: 1 }
    }

    /// Cubic polynomial basis.
    #[must_use]
    pub const fn cubic() -> Self {
        Self::Polynomial { degree: 3 }
    }

    /// Quartic polynomial basis.
    #[must_use]
    pub const fn quartic() -> Self {
        Self::Polynomial { degree: 4 }
    }

    /// Number of basis functions.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Polynomial { degree } => degree + 1,
            _ => 4,
        }
    }

    /// Checks the shape parameters.
    pub fn validate(&self) -> MathResult<()> {
        let ok = match *self {
            Self::Polynomial { degree } => (1..=8).contains(&degree),
            Self::KaklisPandelis { exponent } => (3..=16).contains(&exponent),
            Self::ExponentialTension { tension } | Self::HyperbolicTension { tension } => {
                tension.is_finite() && tension > 0.0 && tension <= 50.0
            }
            Self::RationalLinearTension { tension } | Self::RationalQuadraticTension { tension } => {
                tension.is_finite() && tension >= 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(MathError::invalid_input(format!("invalid segment basis {self}")))
        }
    }

    /// Derivative of order `order` (0, 1 or 2; any order for polynomials)
    /// of basis function `k` at local coordinate `u`.
    #[must_use]
    pub fn evaluate(&self, k: usize, u: f64, order: usize) -> f64 {
        match *self {
            Self::Polynomial { .. } => monomial(k, u, order),
            _ if k < 2 => monomial(k, u, order),
            Self::KaklisPandelis { exponent } => {
                let p = f64::from(exponent);
                let (base, sign) = if k == 2 { (1.0 - u, -1.0) } else { (u, 1.0) };
                match order {
                    0 => base.powi(exponent),
                    1 => sign * p * base.powi(exponent - 1),
                    2 => p * (p - 1.0) * base.powi(exponent - 2),
                    _ => f64::NAN,
                }
            }
            Self::ExponentialTension { tension } => {
                let (arg, slope) = if k == 2 { (-tension * u, -tension) } else { (-tension * (1.0 - u), tension) };
                let e = arg.exp();
                match order {
                    0 => e,
                    1 => slope * e,
                    2 => slope * slope * e,
                    _ => f64::NAN,
                }
            }
            Self::HyperbolicTension { tension } => {
                let x = tension * u;
                let (c, s) = (x.cosh(), x.sinh());
                let (even, odd) = if k == 2 { (c, s) } else { (s, c) };
                match order {
                    0 => even,
                    1 => tension * odd,
                    2 => tension * tension * even,
                    _ => f64::NAN,
                }
            }
            Self::RationalLinearTension { tension } => {
                if k == 2 {
                    rational(cube_down(u), [1.0 + tension * u, tension, 0.0], order)
                } else {
                    rational(cube_up(u), [1.0 + tension * (1.0 - u), -tension, 0.0], order)
                }
            }
            Self::RationalQuadraticTension { tension } => {
                let d = [1.0 + tension * u * (1.0 - u), tension * (1.0 - 2.0 * u), -2.0 * tension];
                let n = if k == 2 { cube_down(u) } else { cube_up(u) };
                rational(n, d, order)
            }
        }
    }

    /// Short identifier used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Polynomial { degree: 3 } => "cubic_polynomial",
            Self::Polynomial { degree: 4 } => "quartic_polynomial",
            Self::Polynomial { .. } => "polynomial",
            Self::KaklisPandelis { .. } => "kaklis_pandelis",
            Self::ExponentialTension { .. } => "klk_exponential_tension",
            Self::HyperbolicTension { .. } => "klk_hyperbolic_tension",
            Self::RationalLinearTension { .. } => "klk_rational_linear_tension",
            Self::RationalQuadraticTension { .. } => "klk_rational_quadratic_tension",
        }
    }
}

impl fmt::Display for SegmentBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polynomial { degree } => write!(f, "polynomial(degree={degree})"),
            Self::KaklisPandelis { exponent } => write!(f, "kaklis_pandelis(p={exponent})"),
            Self::ExponentialTension { tension }
            | Self::HyperbolicTension { tension }
            | Self::RationalLinearTension { tension }
            | Self::RationalQuadraticTension { tension } => {
                write!(f, "{}(tension={tension})", self.name())
            }
        }
    }
}

fn monomial(k: usize, u: f64, order: usize) -> f64 {
    if order > k {
        return 0.0;
    }
    let factor: f64 = ((k - order + 1)..=k).map(|j| j as f64).product();
    factor * u.powi((k - order) as i32)
}

/// `(1-u)^3` with its first two derivatives.
fn cube_down(u: f64) -> [f64; 3] {
    let w = 1.0 - u;
    [w * w * w, -3.0 * w * w, 6.0 * w]
}

/// `u^3` with its first two derivatives.
fn cube_up(u: f64) -> [f64; 3] {
    [u * u * u, 3.0 * u * u, 6.0 * u]
}

/// Derivative of `n / d` given value and first two derivatives of each.
fn rational(n: [f64; 3], d: [f64; 3], order: usize) -> f64 {
    let [n0, n1, n2] = n;
    let [d0, d1, d2] = d;
    match order {
        0 => n0 / d0,
        1 => (n1 * d0 - n0 * d1) / (d0 * d0),
        2 => n2 / d0 - 2.0 * n1 * d1 / (d0 * d0) - n0 * d2 / (d0 * d0) + 2.0 * n0 * d1 * d1 / (d0 * d0 * d0),
        _ => f64::NAN,
    }
}
