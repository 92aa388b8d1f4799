//! Global smoothing: one stretch through every knot at once.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::minimize_quadratic_with_constraints;
use crate::numerics::gauss_legendre;
use crate::spline::stretch::validate_knots;
use crate::spline::{BoundaryCondition, Segment, SegmentControl, Stretch};

struct Row {
    entries: Vec<(usize, f64)>,
    value: f64,
}

impl Stretch {
    /// Fits a single stretch through `(xs, ys)` under one segment control.
    ///
    /// Values are matched at both ends of every segment, derivatives up to the
    /// continuity order are matched at interior knots, and the boundary
    /// condition is applied at the two edges. A control that leaves no room
    /// for the edge conditions is rejected. Remaining freedom minimizes total
    /// curvature.
    ///
    /// ```rust
    /// use strata_math::spline::{BoundaryCondition, SegmentBasis, SegmentControl, Stretch};
    ///
    /// let control = SegmentControl::new(SegmentBasis::cubic(), 2).unwrap();
    /// let s = Stretch::global_fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], control, BoundaryCondition::Natural).unwrap();
    /// assert!((s.response(1.0) - 1.0).abs() < 1e-12);
    /// ```
    pub fn global_fit(
        xs: &[f64],
        ys: &[f64],
        control: SegmentControl,
        boundary: BoundaryCondition,
    ) -> MathResult<Self> {
        control.validate()?;
        validate_knots(xs)?;
        if ys.len() != xs.len() {
            return Err(MathError::invalid_input(format!(
                "{} ordinates for {} knots",
                ys.len(),
                xs.len()
            )));
        }
        if ys.iter().any(|y| !y.is_finite()) {
            return Err(MathError::invalid_input("non-finite knot response"));
        }

        let basis = control.basis;
        let n = basis.size();
        let segments = xs.len() - 1;
        let unknowns = n * segments;
        let width = |s: usize| xs[s + 1] - xs[s];
        let row_at = |s: usize, u: f64, order: usize, sign: f64| -> Vec<(usize, f64)> {
            let scale = width(s).powi(order as i32);
            (0..n)
                .map(|k| (s * n + k, sign * basis.evaluate(k, u, order) / scale))
                .collect()
        };

        let mut rows = Vec::new();
        for s in 0..segments {
            rows.push(Row {
                entries: row_at(s, 0.0, 0, 1.0),
                value: ys[s],
            });
            rows.push(Row {
                entries: row_at(s, 1.0, 0, 1.0),
                value: ys[s + 1],
            });
        }
        for s in 1..segments {
            for order in 1..=control.continuity {
                let mut entries = row_at(s - 1, 1.0, order, 1.0);
                entries.extend(row_at(s, 0.0, order, -1.0));
                rows.push(Row { entries, value: 0.0 });
            }
        }
        if control.supports_edge_conditions() {
            let right_order = match boundary {
                BoundaryCondition::Natural => 2,
                BoundaryCondition::Financial => 1,
            };
            if rows.len() + 2 > unknowns {
                return Err(MathError::invalid_input(format!(
                    "{basis} with C{} has no room for the {boundary:?} edge conditions",
                    control.continuity
                )));
            }
            rows.push(Row {
                entries: row_at(0, 0.0, 2, 1.0),
                value: 0.0,
            });
            rows.push(Row {
                entries: row_at(segments - 1, 1.0, right_order, 1.0),
                value: 0.0,
            });
        }
        if rows.len() > unknowns {
            return Err(MathError::invalid_input(format!(
                "{} with C{} cannot satisfy {} conditions with {unknowns} coefficients",
                basis,
                control.continuity,
                rows.len()
            )));
        }

        let mut a = DMatrix::<f64>::zeros(rows.len(), unknowns);
        let mut b = DVector::<f64>::zeros(rows.len());
        for (r, row) in rows.iter().enumerate() {
            for &(c, v) in &row.entries {
                a[(r, c)] += v;
            }
            b[r] = row.value;
        }

        let mut q = DMatrix::<f64>::zeros(unknowns, unknowns);
        for s in 0..segments {
            let scale = width(s).powi(3);
            for k in 0..n {
                for l in k..n {
                    let v = gauss_legendre(
                        |u| basis.evaluate(k, u, 2) * basis.evaluate(l, u, 2),
                        0.0,
                        1.0,
                    ) / scale;
                    q[(s * n + k, s * n + l)] = v;
                    q[(s * n + l, s * n + k)] = v;
                }
            }
        }

        let coefficients = minimize_quadratic_with_constraints(&q, &a, &b, "global stretch fit")?;
        let pieces = (0..segments)
            .map(|s| {
                Segment::from_coefficients(
                    xs[s],
                    xs[s + 1],
                    basis,
                    coefficients.rows(s * n, n).iter().copied().collect(),
                )
            })
            .collect::<MathResult<Vec<_>>>()?;

        debug!("global fit over {segments} segments with {basis}");
        Stretch::from_segments(pieces)
    }
}
