//! Refitting truth values for smoother curves.

use serde::{Deserialize, Serialize};
use strata_math::spline::{BoundaryCondition, LocalControl, SegmentControl, Stretch};

use crate::error::CurveResult;

/// How extracted truth values are refitted.
///
/// `Global` fits one stretch through every value with a single segment
/// control and boundary condition, minimizing total curvature. `Local` fits
/// C¹ Hermite segments with locally generated slopes and never overshoots
/// between neighbouring values when the monotone options are on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Smoothing {
    /// One unified stretch.
    Global {
        /// Segment design for every segment.
        control: SegmentControl,
        /// Edge conditions.
        boundary: BoundaryCondition,
    },
    /// Local Hermite scheme.
    Local(LocalControl),
}

impl Smoothing {
    /// Fits `(xs, ys)`.
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> CurveResult<Stretch> {
        let stretch = match self {
            Self::Global { control, boundary } => Stretch::global_fit(xs, ys, *control, *boundary)?,
            Self::Local(control) => Stretch::local_fit(xs, ys, control)?,
        };
        Ok(stretch)
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::Local(LocalControl::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strata_math::spline::C1Generator;

    #[test]
    fn test_both_fits_hit_knots() {
        let xs = [0.0, 0.5, 1.0, 2.0, 5.0];
        let ys = [0.03, 0.032, 0.035, 0.036, 0.04];
        let global = Smoothing::Global {
            control: SegmentControl::new(strata_math::spline::SegmentBasis::cubic(), 2).unwrap(),
            boundary: BoundaryCondition::Natural,
        };
        let local = Smoothing::Local(LocalControl::monotone(C1Generator::Harmonic));
        for smoothing in [global, local] {
            let stretch = smoothing.fit(&xs, &ys).unwrap();
            for (x, y) in xs.iter().zip(&ys) {
                assert_relative_eq!(stretch.response(*x), *y, epsilon = 1e-12);
            }
        }
    }
}
