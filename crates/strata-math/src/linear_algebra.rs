//! Dense linear solves used by the spline engine.
//!
//! Systems here are small (one segment) to moderate (a global fit across a
//! few hundred coefficients), so dense LU from nalgebra is sufficient.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves `A x = b` with partial-pivoting LU.
pub fn solve_dense(a: DMatrix<f64>, b: &DVector<f64>, context: &str) -> MathResult<DVector<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return Err(MathError::invalid_input(format!(
            "{context}: system is {}x{} with {} right-hand values",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }
    let x = a.lu().solve(b).ok_or_else(|| MathError::singular(context))?;
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(MathError::singular(context))
    }
}

/// Minimizes `xᵀ Q x` subject to `A x = b`.
///
/// When `A` is square the constraints alone fix `x`; otherwise the KKT system
///
/// ```text
/// | 2Q  Aᵀ | |x|   |0|
/// | A   0  | |λ| = |b|
/// ```
///
/// is solved. More constraints than unknowns is an error.
pub fn minimize_quadratic_with_constraints(
    q: &DMatrix<f64>,
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    context: &str,
) -> MathResult<DVector<f64>> {
    let n = q.nrows();
    let m = a.nrows();
    if q.ncols() != n || a.ncols() != n || b.len() != m {
        return Err(MathError::invalid_input(format!(
            "{context}: inconsistent dimensions"
        )));
    }
    if m > n {
        return Err(MathError::invalid_input(format!(
            "{context}: {m} constraints over-determine {n} coefficients"
        )));
    }
    if m == n {
        return solve_dense(a.clone(), b, context);
    }

    let mut kkt = DMatrix::<f64>::zeros(n + m, n + m);
    kkt.view_mut((0, 0), (n, n)).copy_from(&(q * 2.0));
    kkt.view_mut((0, n), (n, m)).copy_from(&a.transpose());
    kkt.view_mut((n, 0), (m, n)).copy_from(a);

    let mut rhs = DVector::<f64>::zeros(n + m);
    rhs.rows_mut(n, m).copy_from(b);

    let solution = solve_dense(kkt, &rhs, context)?;
    Ok(solution.rows(0, n).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_dense() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![3.0, 5.0]);
        let x = solve_dense(a, &b, "test").unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert!(solve_dense(a, &b, "singular").is_err());
    }

    #[test]
    fn test_constrained_minimum() {
        // minimize x0^2 + x1^2 subject to x0 + x1 = 2
        let q = DMatrix::identity(2, 2);
        let a = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let b = DVector::from_vec(vec![2.0]);
        let x = minimize_quadratic_with_constraints(&q, &a, &b, "qp").unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overdetermined() {
        let q = DMatrix::identity(1, 1);
        let a = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(minimize_quadratic_with_constraints(&q, &a, &b, "over").is_err());
    }
}
