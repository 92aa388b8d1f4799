//! A single spline segment and its constrained fit.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::minimize_quadratic_with_constraints;
use crate::numerics::gauss_legendre;
use crate::spline::SegmentBasis;

/// A linear condition on a derivative at one end of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeConstraint {
    /// `false` for the left edge, `true` for the right edge.
    pub at_right: bool,
    /// Derivative order (0 for the value).
    pub order: usize,
    /// Required value in x-units.
    pub value: f64,
}

impl EdgeConstraint {
    pub(crate) fn left(order: usize, value: f64) -> Self {
        Self {
            at_right: false,
            order,
            value,
        }
    }

    pub(crate) fn right(order: usize, value: f64) -> Self {
        Self {
            at_right: true,
            order,
            value,
        }
    }
}

/// One piece of a stretch: `y(x) = Σ c_k f_k((x - left) / (right - left))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    left: f64,
    right: f64,
    basis: SegmentBasis,
    coefficients: Vec<f64>,
}

impl Segment {
    /// Builds a segment from explicit coefficients.
    pub fn from_coefficients(
        left: f64,
        right: f64,
        basis: SegmentBasis,
        coefficients: Vec<f64>,
    ) -> MathResult<Self> {
        if !(right > left) || !left.is_finite() || !right.is_finite() {
            return Err(MathError::invalid_input(format!(
                "segment [{left}, {right}] is empty or non-finite"
            )));
        }
        if coefficients.len() != basis.size() {
            return Err(MathError::invalid_input(format!(
                "{basis} needs {} coefficients, got {}",
                basis.size(),
                coefficients.len()
            )));
        }
        Ok(Self {
            left,
            right,
            basis,
            coefficients,
        })
    }

    /// Fits the coefficients to edge constraints, minimizing curvature.
    pub(crate) fn fit(
        left: f64,
        right: f64,
        basis: SegmentBasis,
        constraints: &[EdgeConstraint],
    ) -> MathResult<Self> {
        let n = basis.size();
        let h = right - left;
        let mut a = DMatrix::<f64>::zeros(constraints.len(), n);
        let mut b = DVector::<f64>::zeros(constraints.len());
        for (row, c) in constraints.iter().enumerate() {
            let r = constraint_row(&basis, h, c.at_right, c.order);
            for (k, v) in r.into_iter().enumerate() {
                a[(row, k)] = v;
            }
            b[row] = c.value;
        }
        let q = curvature_matrix(&basis, h);
        let coefficients =
            minimize_quadratic_with_constraints(&q, &a, &b, "segment coefficient fit")?;
        Self::from_coefficients(left, right, basis, coefficients.iter().copied().collect())
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Segment width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// The basis family.
    #[must_use]
    pub fn basis(&self) -> SegmentBasis {
        self.basis
    }

    /// Basis coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn local(&self, x: f64) -> f64 {
        (x - self.left) / self.width()
    }

    fn eval_local(&self, u: f64, order: usize) -> f64 {
        let scale = self.width().powi(order as i32);
        self.coefficients
            .iter()
            .enumerate()
            .map(|(k, c)| c * self.basis.evaluate(k, u, order))
            .sum::<f64>()
            / scale
    }

    /// Response at `x` (not clamped to the segment).
    #[must_use]
    pub fn response(&self, x: f64) -> f64 {
        self.eval_local(self.local(x), 0)
    }

    /// Derivative of order 1 or 2 at `x`.
    #[must_use]
    pub fn derivative(&self, x: f64, order: usize) -> f64 {
        self.eval_local(self.local(x), order)
    }

    /// Derivative of the given order at the right edge.
    #[must_use]
    pub fn right_derivative(&self, order: usize) -> f64 {
        self.eval_local(1.0, order)
    }

    /// Integral of the response over `[a, b]`, both inside the segment.
    #[must_use]
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        gauss_legendre(|x| self.response(x), a, b)
    }

    /// `∫ y''(x)² dx` over the segment.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        gauss_legendre(|x| self.derivative(x, 2).powi(2), self.left, self.right)
    }
}

fn constraint_row(basis: &SegmentBasis, h: f64, at_right: bool, order: usize) -> Vec<f64> {
    let u = if at_right { 1.0 } else { 0.0 };
    let scale = h.powi(order as i32);
    (0..basis.size())
        .map(|k| basis.evaluate(k, u, order) / scale)
        .collect()
}

fn curvature_matrix(basis: &SegmentBasis, h: f64) -> DMatrix<f64> {
    let n = basis.size();
    let mut q = DMatrix::<f64>::zeros(n, n);
    let scale = h.powi(3);
    for k in 0..n {
        for l in k..n {
            let v = gauss_legendre(|u| basis.evaluate(k, u, 2) * basis.evaluate(l, u, 2), 0.0, 1.0)
                / scale;
            q[(k, l)] = v;
            q[(l, k)] = v;
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_hermite_cubic() {
        // value and slope at both ends fix a cubic completely
        let constraints = [
            EdgeConstraint::left(0, 1.0),
            EdgeConstraint::left(1, 0.0),
            EdgeConstraint::right(0, 2.0),
            EdgeConstraint::right(1, 0.0),
        ];
        let seg = Segment::fit(1.0, 3.0, SegmentBasis::cubic(), &constraints).unwrap();
        assert_relative_eq!(seg.response(1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(seg.response(3.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(seg.response(2.0), 1.5, epsilon = 1e-12);
        assert_relative_eq!(seg.right_derivative(1), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_coefficient_minimizes_curvature() {
        // with only values and a left slope, the optimum has zero curvature at the right edge
        let constraints = [
            EdgeConstraint::left(0, 0.0),
            EdgeConstraint::left(1, 1.0),
            EdgeConstraint::right(0, 2.0),
        ];
        let seg = Segment::fit(0.0, 1.0, SegmentBasis::cubic(), &constraints).unwrap();
        assert_relative_eq!(seg.right_derivative(2), 0.0, epsilon = 1e-10);
        assert_relative_eq!(seg.response(1.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_integral() {
        let seg = Segment::from_coefficients(0.0, 2.0, SegmentBasis::linear(), vec![1.0, 2.0]).unwrap();
        // y = 1 + x over [0, 2]
        assert_relative_eq!(seg.integral(0.0, 2.0), 4.0, epsilon = 1e-12);
        assert_relative_eq!(seg.derivative(0.5, 1), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_segment() {
        assert!(Segment::from_coefficients(1.0, 1.0, SegmentBasis::linear(), vec![0.0, 0.0]).is_err());
        assert!(Segment::from_coefficients(0.0, 1.0, SegmentBasis::cubic(), vec![0.0]).is_err());
    }
}
