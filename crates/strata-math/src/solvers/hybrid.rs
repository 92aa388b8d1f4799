//! Derivative-free root search from an initial guess.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{brent, SolverConfig, SolverResult};

const SECANT_ITERATIONS: u32 = 30;
const MAX_EXPANSIONS: u32 = 60;

/// Finds a root of `f` starting from `initial_guess`.
///
/// Runs a secant iteration first. If the secant stalls, diverges, or meets
/// a non-finite value, a bracket is grown geometrically around the guess
/// and handed to [`brent`].
///
/// ```rust
/// use strata_math::solvers::{find_root, SolverConfig};
///
/// let r = find_root(|x| x.exp() - 2.0, 0.1, &SolverConfig::default()).unwrap();
/// assert!((r.root - 2f64.ln()).abs() < 1e-10);
/// ```
pub fn find_root<F>(f: F, initial_guess: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    match secant_from(&f, initial_guess, config) {
        Ok(result) => Ok(result),
        Err(err) => {
            trace!("secant failed from {initial_guess}: {err}; expanding bracket");
            let (a, b) = find_bracket(&f, initial_guess).ok_or_else(|| {
                MathError::invalid_input(format!(
                    "no sign change found around initial guess {initial_guess}"
                ))
            })?;
            brent(&f, a, b, config)
        }
    }
}

fn secant_from<F>(f: &F, initial_guess: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut x0 = initial_guess;
    let mut f0 = f(x0);
    if !f0.is_finite() {
        return Err(MathError::NonFinite { x: x0 });
    }
    if f0.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x0,
            iterations: 0,
            residual: f0,
        });
    }

    let mut x1 = x0 + (1e-4 * x0.abs()).max(1e-6);
    let mut f1 = f(x1);
    let start = f0.abs();

    for iteration in 1..=config.max_iterations.min(SECANT_ITERATIONS) {
        if !f1.is_finite() {
            return Err(MathError::NonFinite { x: x1 });
        }
        if f1.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x1,
                iterations: iteration,
                residual: f1,
            });
        }
        let denom = f1 - f0;
        if denom == 0.0 {
            break;
        }
        let x2 = x1 - f1 * (x1 - x0) / denom;
        if !x2.is_finite() || f1.abs() > 1e6 * start.max(config.tolerance) {
            break;
        }
        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f(x1);
    }

    Err(MathError::convergence_failed(SECANT_ITERATIONS, f1.abs()))
}

/// Grows a bracket geometrically around `initial_guess` until `f` changes sign.
pub fn find_bracket<F>(f: &F, initial_guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_init = f(initial_guess);
    if !f_init.is_finite() {
        return None;
    }
    let mut delta = (1e-3 * initial_guess.abs()).max(1e-4);
    let mut search_left = true;
    let mut search_right = true;

    for _ in 0..MAX_EXPANSIONS {
        if search_left {
            let left = initial_guess - delta;
            let f_left = f(left);
            if !f_left.is_finite() {
                search_left = false;
            } else if f_left * f_init <= 0.0 {
                return Some((left, initial_guess));
            }
        }
        if search_right {
            let right = initial_guess + delta;
            let f_right = f(right);
            if !f_right.is_finite() {
                search_right = false;
            } else if f_right * f_init <= 0.0 {
                return Some((initial_guess, right));
            }
        }
        if !search_left && !search_right {
            return None;
        }
        delta *= 1.6;
    }
    None
}
