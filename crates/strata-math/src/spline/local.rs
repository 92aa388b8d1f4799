//! Local smoothing: C¹ Hermite segments with generated slopes.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::spline::stretch::validate_knots;
use crate::spline::{Segment, SegmentBasis, Stretch};

/// How knot slopes are generated from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum C1Generator {
    /// Slope of the parabola through three neighbouring points.
    #[default]
    Bessel,
    /// Weighted harmonic mean of neighbouring secants (Fritsch-Butland);
    /// zero where the secants change sign.
    Harmonic,
    /// Akima's weighted average, insensitive to isolated outliers.
    Akima,
}

/// Settings for the local Hermite fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalControl {
    /// Slope generator.
    pub generator: C1Generator,
    /// Zero any slope whose sign contradicts both neighbouring secants.
    pub eliminate_spurious_extrema: bool,
    /// Apply the Hyman monotonicity filter to the slopes.
    pub apply_monotone_filter: bool,
}

impl LocalControl {
    /// A monotone-preserving configuration.
    #[must_use]
    pub fn monotone(generator: C1Generator) -> Self {
        Self {
            generator,
            eliminate_spurious_extrema: true,
            apply_monotone_filter: true,
        }
    }
}

impl Stretch {
    /// Fits cubic Hermite segments through `(xs, ys)` with locally generated slopes.
    pub fn local_fit(xs: &[f64], ys: &[f64], control: &LocalControl) -> MathResult<Self> {
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

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let d: Vec<f64> = ys
            .windows(2)
            .zip(&h)
            .map(|(w, hi)| (w[1] - w[0]) / hi)
            .collect();

        let mut m = match control.generator {
            C1Generator::Bessel => bessel_slopes(&h, &d),
            C1Generator::Harmonic => harmonic_slopes(&h, &d),
            C1Generator::Akima => akima_slopes(&h, &d),
        };
        if control.eliminate_spurious_extrema {
            eliminate_spurious_extrema(&d, &mut m);
        }
        if control.apply_monotone_filter {
            monotone_filter(&d, &mut m);
        }

        let segments = (0..h.len())
            .map(|i| {
                let (y0, y1, hi) = (ys[i], ys[i + 1], h[i]);
                let coefficients = vec![
                    y0,
                    hi * m[i],
                    3.0 * (y1 - y0) - 2.0 * hi * m[i] - hi * m[i + 1],
                    2.0 * (y0 - y1) + hi * m[i] + hi * m[i + 1],
                ];
                Segment::from_coefficients(xs[i], xs[i + 1], SegmentBasis::cubic(), coefficients)
            })
            .collect::<MathResult<Vec<_>>>()?;
        Stretch::from_segments(segments)
    }
}

fn bessel_slopes(h: &[f64], d: &[f64]) -> Vec<f64> {
    let s = d.len();
    if s == 1 {
        return vec![d[0], d[0]];
    }
    let mut m = vec![0.0; s + 1];
    for i in 1..s {
        m[i] = (h[i] * d[i - 1] + h[i - 1] * d[i]) / (h[i - 1] + h[i]);
    }
    m[0] = ((2.0 * h[0] + h[1]) * d[0] - h[0] * d[1]) / (h[0] + h[1]);
    m[s] = ((2.0 * h[s - 1] + h[s - 2]) * d[s - 1] - h[s - 1] * d[s - 2]) / (h[s - 1] + h[s - 2]);
    m
}

fn harmonic_slopes(h: &[f64], d: &[f64]) -> Vec<f64> {
    let s = d.len();
    let mut m = vec![0.0; s + 1];
    m[0] = d[0];
    m[s] = d[s - 1];
    for i in 1..s {
        if d[i - 1] * d[i] > 0.0 {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            m[i] = (w1 + w2) / (w1 / d[i - 1] + w2 / d[i]);
        }
    }
    m
}

fn akima_slopes(h: &[f64], d: &[f64]) -> Vec<f64> {
    let s = d.len();
    if s < 2 {
        return bessel_slopes(h, d);
    }
    // secants extended by two on each side; ext[j + 2] = d[j]
    let mut ext = Vec::with_capacity(s + 4);
    let dm1 = 2.0 * d[0] - d[1];
    ext.push(2.0 * dm1 - d[0]);
    ext.push(dm1);
    ext.extend_from_slice(d);
    let dp = 2.0 * d[s - 1] - d[s - 2];
    ext.push(dp);
    ext.push(2.0 * dp - d[s - 1]);

    (0..=s)
        .map(|i| {
            let (a, b, c, e) = (ext[i], ext[i + 1], ext[i + 2], ext[i + 3]);
            let w1 = (e - c).abs();
            let w2 = (b - a).abs();
            if w1 + w2 < 1e-14 {
                0.5 * (b + c)
            } else {
                (w1 * b + w2 * c) / (w1 + w2)
            }
        })
        .collect()
}

fn eliminate_spurious_extrema(d: &[f64], m: &mut [f64]) {
    let s = d.len();
    if m[0] * d[0] < 0.0 {
        m[0] = 0.0;
    }
    if m[s] * d[s - 1] < 0.0 {
        m[s] = 0.0;
    }
    for i in 1..s {
        if d[i - 1] * d[i] > 0.0 && m[i] * d[i] < 0.0 {
            m[i] = 0.0;
        }
    }
}

fn monotone_filter(d: &[f64], m: &mut [f64]) {
    let s = d.len();
    let clamp = |slope: f64, bound: f64, sign: f64| -> f64 {
        if slope * sign <= 0.0 {
            0.0
        } else {
            sign * (slope.abs()).min(bound)
        }
    };
    m[0] = clamp(m[0], 3.0 * d[0].abs(), d[0].signum());
    m[s] = clamp(m[s], 3.0 * d[s - 1].abs(), d[s - 1].signum());
    for i in 1..s {
        m[i] = if d[i - 1] * d[i] > 0.0 {
            clamp(m[i], 3.0 * d[i - 1].abs().min(d[i].abs()), d[i].signum())
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn is_monotone_increasing(s: &Stretch, lo: f64, hi: f64) -> bool {
        let n = 400;
        let mut prev = s.response(lo);
        for k in 1..=n {
            let x = lo + (hi - lo) * f64::from(k) / f64::from(n);
            let y = s.response(x);
            if y < prev - 1e-14 {
                return false;
            }
            prev = y;
        }
        true
    }

    #[test]
    fn test_passes_through_knots_with_c1_joins() {
        let xs = [0.0, 1.0, 2.5, 4.0, 7.0];
        let ys = [0.01, 0.02, 0.021, 0.035, 0.04];
        for generator in [C1Generator::Bessel, C1Generator::Harmonic, C1Generator::Akima] {
            let s = Stretch::local_fit(&xs, &ys, &LocalControl::monotone(generator)).unwrap();
            for (x, y) in xs.iter().zip(ys) {
                assert_abs_diff_eq!(s.response(*x), y, epsilon = 1e-14);
            }
            for w in s.segments().windows(2) {
                assert_abs_diff_eq!(
                    w[0].right_derivative(1),
                    w[1].derivative(w[1].left(), 1),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_monotone_filter_prevents_overshoot() {
        // a step in the data makes unfiltered Bessel slopes overshoot
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.0, 1.0, 1.0, 1.0];
        let raw = Stretch::local_fit(&xs, &ys, &LocalControl::default()).unwrap();
        assert!(!is_monotone_increasing(&raw, 0.0, 4.0));

        let filtered = Stretch::local_fit(&xs, &ys, &LocalControl::monotone(C1Generator::Bessel)).unwrap();
        assert!(is_monotone_increasing(&filtered, 0.0, 4.0));
    }

    #[test]
    fn test_spurious_extremum_removed() {
        let d = [1.0, 0.1];
        let mut m = vec![1.0, -0.2, 0.1];
        eliminate_spurious_extrema(&d, &mut m);
        assert_abs_diff_eq!(m[1], 0.0);
        assert_abs_diff_eq!(m[0], 1.0);
    }
}
