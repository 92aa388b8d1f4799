//! Shape-preserving sequential calibration.
//!
//! Segments are solved left to right. Each new segment inherits the value
//! and the matched derivatives of its left neighbour, and its right-edge
//! value is the single unknown, found by a one-dimensional root search that
//! drives the caller's residual for that segment to zero. Segments already
//! solved are never revisited.
//!
//! Both boundary conditions start from zero curvature at the left edge. The
//! right-edge condition (zero curvature, or zero slope for
//! [`BoundaryCondition::Financial`]) is imposed on the last segment when its
//! basis has a coefficient to spare.

use std::cell::RefCell;

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{find_root, SolverConfig};
use crate::spline::segment::EdgeConstraint;
use crate::spline::stretch::validate_knots;
use crate::spline::{BoundaryCondition, Segment, SegmentControl, Stretch};

/// Left-to-right calibrator over a fixed knot set.
///
/// ```rust
/// use strata_math::spline::{BoundaryCondition, SegmentControl, SequentialCalibrator};
///
/// let knots = [0.0, 1.0, 2.0, 3.0];
/// let targets = [0.9, 0.85, 0.7];
/// let calibrator = SequentialCalibrator::new(SegmentControl::default(), BoundaryCondition::Natural);
/// let stretch = calibrator
///     .calibrate(&knots, 1.0, &[1.0; 3], |i, s| s.response(knots[i + 1]) - targets[i])
///     .unwrap();
/// assert!((stretch.response(2.0) - 0.85).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialCalibrator {
    control: SegmentControl,
    boundary: BoundaryCondition,
    config: SolverConfig,
}

impl SequentialCalibrator {
    /// Creates a calibrator with default solver settings.
    #[must_use]
    pub fn new(control: SegmentControl, boundary: BoundaryCondition) -> Self {
        Self {
            control,
            boundary,
            config: SolverConfig::default().with_tolerance(1e-12),
        }
    }

    /// Sets the solver configuration.
    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The segment control.
    #[must_use]
    pub fn control(&self) -> SegmentControl {
        self.control
    }

    /// Calibrates one segment per knot interval.
    ///
    /// `residual(i, stretch)` is evaluated on a stretch whose last segment is
    /// the trial segment `i`; it must return zero when segment `i` is right.
    /// `guesses[i]` seeds the search for the right-edge value of segment `i`.
    pub fn calibrate<R>(
        &self,
        knots: &[f64],
        epoch_response: f64,
        guesses: &[f64],
        residual: R,
    ) -> MathResult<Stretch>
    where
        R: Fn(usize, &Stretch) -> f64,
    {
        self.control.validate()?;
        validate_knots(knots)?;
        let segment_count = knots.len() - 1;
        if guesses.len() != segment_count {
            return Err(MathError::invalid_input(format!(
                "{} guesses supplied for {segment_count} segments",
                guesses.len()
            )));
        }
        if !epoch_response.is_finite() {
            return Err(MathError::invalid_input("epoch response is not finite"));
        }

        let working = RefCell::new(Stretch::anchored(knots[0]));
        let mut inherited = vec![EdgeConstraint::left(0, epoch_response)];
        if self.control.supports_edge_conditions() {
            inherited.push(EdgeConstraint::left(2, 0.0));
        }

        for i in 0..segment_count {
            let (left, right) = (knots[i], knots[i + 1]);
            let basis = self.control.basis;
            // the last segment also carries the right-edge condition if a coefficient is left over
            let terminal = (i + 1 == segment_count && inherited.len() + 2 <= basis.size())
                .then_some(right_edge_condition(self.boundary));
            let build = |value: f64| {
                let mut constraints = inherited.clone();
                constraints.push(EdgeConstraint::right(0, value));
                constraints.extend(terminal);
                Segment::fit(left, right, basis, &constraints)
            };

            let objective = |value: f64| match build(value) {
                Ok(segment) => {
                    working.borrow_mut().set_segment(i, segment);
                    residual(i, &working.borrow())
                }
                Err(_) => f64::NAN,
            };

            let solved = find_root(objective, guesses[i], &self.config)
                .map_err(|e| MathError::segment_calibration(i, e.to_string()))?;

            let segment = build(solved.root).map_err(|e| MathError::segment_calibration(i, e.to_string()))?;
            working.borrow_mut().set_segment(i, segment.clone());
            let achieved = residual(i, &working.borrow());
            if !(achieved.abs() <= self.config.tolerance) {
                return Err(MathError::segment_calibration(
                    i,
                    format!("residual {achieved:.3e} exceeds tolerance {:.1e}", self.config.tolerance),
                ));
            }

            inherited = vec![EdgeConstraint::left(0, segment.right_derivative(0))];
            for order in 1..=self.control.continuity {
                inherited.push(EdgeConstraint::left(order, segment.right_derivative(order)));
            }
        }

        debug!(
            "calibrated {segment_count} segments with {} (C{})",
            self.control.basis, self.control.continuity
        );
        Ok(working.into_inner())
    }
}

/// Zero curvature at the right edge, or zero slope for a financial stretch.
fn right_edge_condition(boundary: BoundaryCondition) -> EdgeConstraint {
    match boundary {
        BoundaryCondition::Natural => EdgeConstraint::right(2, 0.0),
        BoundaryCondition::Financial => EdgeConstraint::right(1, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::SegmentBasis;
    use approx::assert_abs_diff_eq;

    fn bases() -> Vec<SegmentControl> {
        vec![
            SegmentControl::default(),
            SegmentControl::new(SegmentBasis::quartic(), 2).unwrap(),
            SegmentControl::new(SegmentBasis::KaklisPandelis { exponent: 4 }, 1).unwrap(),
            SegmentControl::new(SegmentBasis::ExponentialTension { tension: 1.0 }, 1).unwrap(),
            SegmentControl::new(SegmentBasis::HyperbolicTension { tension: 1.0 }, 1).unwrap(),
            SegmentControl::new(SegmentBasis::RationalLinearTension { tension: 1.0 }, 1).unwrap(),
            SegmentControl::new(SegmentBasis::RationalQuadraticTension { tension: 1.0 }, 1).unwrap(),
            SegmentControl::linear(),
        ]
    }

    #[test]
    fn test_reproduces_average_targets_for_every_basis() {
        // target: average response over [0, knot]
        let knots = [0.0, 0.5, 1.0, 2.0, 5.0];
        let targets = [0.99, 0.975, 0.95, 0.88];
        for control in bases() {
            let cal = SequentialCalibrator::new(control, BoundaryCondition::Natural);
            let stretch = cal
                .calibrate(&knots, 1.0, &[1.0; 4], |i, s| {
                    s.integral(0.0, knots[i + 1]) / knots[i + 1] - targets[i]
                })
                .unwrap();
            for (i, t) in targets.iter().enumerate() {
                assert_abs_diff_eq!(stretch.integral(0.0, knots[i + 1]) / knots[i + 1], *t, epsilon = 1e-10);
            }
            assert_abs_diff_eq!(stretch.left_response(), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_continuity_at_joins() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let targets = [0.95, 0.9, 0.8];
        let control = SegmentControl::new(SegmentBasis::quartic(), 2).unwrap();
        let stretch = SequentialCalibrator::new(control, BoundaryCondition::Natural)
            .calibrate(&knots, 1.0, &[1.0; 3], |i, s| s.response(knots[i + 1]) - targets[i])
            .unwrap();
        let segs = stretch.segments();
        for w in segs.windows(2) {
            let join = w[1].left();
            assert_abs_diff_eq!(w[0].right_derivative(0), w[1].response(join), epsilon = 1e-10);
            for order in 1..=2 {
                assert_abs_diff_eq!(w[0].right_derivative(order), w[1].derivative(join, order), epsilon = 1e-8);
            }
        }
        assert_abs_diff_eq!(segs[0].derivative(0.0, 2), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_earlier_segments_are_not_revisited() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let base = [0.95, 0.9, 0.8];
        let bumped = [0.95, 0.9, 0.7];
        let cal = SequentialCalibrator::new(SegmentControl::default(), BoundaryCondition::Natural);
        let fit = |t: [f64; 3]| {
            cal.calibrate(&knots, 1.0, &[1.0; 3], move |i, s| s.response(knots[i + 1]) - t[i])
                .unwrap()
        };
        let a = fit(base);
        let b = fit(bumped);
        for x in [0.1, 0.7, 1.3, 1.99] {
            assert_abs_diff_eq!(a.response(x), b.response(x), epsilon = 1e-12);
        }
        assert!((a.response(2.5) - b.response(2.5)).abs() > 1e-3);
    }

    #[test]
    fn test_financial_boundary_flattens_the_last_segment() {
        let knots = [0.0, 1.0, 2.0, 4.0];
        let targets = [0.03, 0.034, 0.040];
        let fit = |boundary| {
            SequentialCalibrator::new(SegmentControl::default(), boundary)
                .calibrate(&knots, 0.025, &targets, |i, s| s.response(knots[i + 1]) - targets[i])
                .unwrap()
        };
        let financial = fit(BoundaryCondition::Financial);
        let natural = fit(BoundaryCondition::Natural);

        let terminal_slope = |s: &Stretch| s.segments()[2].right_derivative(1);
        assert_abs_diff_eq!(terminal_slope(&financial), 0.0, epsilon = 1e-12);
        assert!(terminal_slope(&natural).abs() > 1e-4, "{}", terminal_slope(&natural));
        assert_abs_diff_eq!(natural.segments()[2].right_derivative(2), 0.0, epsilon = 1e-10);
        for (i, t) in targets.iter().enumerate() {
            assert_abs_diff_eq!(financial.response(knots[i + 1]), *t, epsilon = 1e-12);
        }
        // only the last segment differs
        for x in [0.5, 1.5, 1.99] {
            assert_abs_diff_eq!(financial.response(x), natural.response(x), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_unreachable_target_fails() {
        let knots = [0.0, 1.0, 2.0];
        let cal = SequentialCalibrator::new(SegmentControl::default(), BoundaryCondition::Natural);
        let err = cal.calibrate(&knots, 1.0, &[1.0; 2], |_, _| 1.0).unwrap_err();
        assert!(matches!(err, MathError::SegmentCalibration { segment: 0, .. }));
    }

    #[test]
    fn test_input_validation() {
        let cal = SequentialCalibrator::new(SegmentControl::default(), BoundaryCondition::Natural);
        assert!(cal.calibrate(&[0.0, 1.0, 1.0], 1.0, &[1.0; 2], |_, _| 0.0).is_err());
        assert!(cal.calibrate(&[0.0, 1.0], 1.0, &[1.0; 2], |_, _| 0.0).is_err());
        assert!(cal.calibrate(&[0.0, 1.0], f64::NAN, &[1.0], |_, _| 0.0).is_err());
    }
}
