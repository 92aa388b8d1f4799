//! Small numerical helpers: tolerance comparison, NaN screening, quadrature.

/// Compares two values with an absolute floor and a relative band.
///
/// When `|a|` is below `abs_tol` the values are compared absolutely,
/// otherwise by the relative difference `|(a - b) / a|`.
///
/// ```rust
/// use strata_math::numerics::within_tolerance;
///
/// assert!(within_tolerance(1.0, 1.0009, 1e-3, 1e-3));
/// assert!(!within_tolerance(1.0, 1.002, 1e-3, 1e-3));
/// ```
#[must_use]
pub fn within_tolerance(a: f64, b: f64, abs_tol: f64, rel_tol: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    if a.abs() < abs_tol {
        return (a - b).abs() < abs_tol;
    }
    ((a - b) / a).abs() < rel_tol
}

/// True if `value` is neither NaN nor infinite.
#[must_use]
pub fn is_valid(value: f64) -> bool {
    value.is_finite()
}

/// True if every value is finite.
#[must_use]
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// True if any of the three arrays holds a NaN.
#[must_use]
pub fn triplet_has_nan(left: &[f64], middle: &[f64], right: &[f64]) -> bool {
    [left, middle, right]
        .iter()
        .any(|values| values.iter().any(|v| v.is_nan()))
}

const GAUSS_LEGENDRE_8: [(f64, f64); 4] = [
    (0.183_434_642_495_649_8, 0.362_683_783_378_362_0),
    (0.525_532_409_916_329_0, 0.313_706_645_877_887_3),
    (0.796_666_477_413_626_7, 0.222_381_034_453_374_5),
    (0.960_289_856_497_536_3, 0.101_228_536_290_376_3),
];

/// Eight-point Gauss-Legendre integral of `f` over `[a, b]`.
///
/// Exact for polynomials up to degree 15.
pub fn gauss_legendre<F>(f: F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let mid = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    GAUSS_LEGENDRE_8
        .iter()
        .map(|&(node, weight)| weight * (f(mid - half * node) + f(mid + half * node)))
        .sum::<f64>()
        * half
}
