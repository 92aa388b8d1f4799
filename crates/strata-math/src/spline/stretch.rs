//! Multi-segment stretches.

use crate::error::{MathError, MathResult};
use crate::spline::Segment;

/// A contiguous sequence of segments over strictly increasing knots.
///
/// Outside `[first knot, last knot]` the response is held flat at the edge
/// value, derivatives are zero, and integrals accumulate the flat value.
#[derive(Debug, Clone, PartialEq)]
pub struct Stretch {
    knots: Vec<f64>,
    segments: Vec<Segment>,
}

impl Stretch {
    /// Assembles a stretch from contiguous segments.
    pub fn from_segments(segments: Vec<Segment>) -> MathResult<Self> {
        let first = segments
            .first()
            .ok_or_else(|| MathError::insufficient_data(1, 0))?;
        let mut knots = Vec::with_capacity(segments.len() + 1);
        knots.push(first.left());
        for (i, seg) in segments.iter().enumerate() {
            let prev = knots[i];
            if seg.left() != prev {
                return Err(MathError::invalid_input(format!(
                    "segment {i} starts at {} but the previous one ends at {prev}",
                    seg.left()
                )));
            }
            knots.push(seg.right());
        }
        Ok(Self { knots, segments })
    }

    /// An empty working stretch anchored at `left`, filled during calibration.
    pub(crate) fn anchored(left: f64) -> Self {
        Self {
            knots: vec![left],
            segments: Vec::new(),
        }
    }

    /// Replaces every segment from index `index` onwards with `segment`.
    pub(crate) fn set_segment(&mut self, index: usize, segment: Segment) {
        self.segments.truncate(index);
        self.knots.truncate(index + 1);
        self.knots.push(segment.right());
        self.segments.push(segment);
    }

    /// Knot ordinates.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First knot.
    #[must_use]
    pub fn left_edge(&self) -> f64 {
        self.knots[0]
    }

    /// Last knot.
    #[must_use]
    pub fn right_edge(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Response at the first knot.
    #[must_use]
    pub fn left_response(&self) -> f64 {
        self.response(self.left_edge())
    }

    /// Response at the last knot.
    #[must_use]
    pub fn right_response(&self) -> f64 {
        self.response(self.right_edge())
    }

    fn locate(&self, x: f64) -> usize {
        let idx = self.knots.partition_point(|&k| k <= x);
        idx.saturating_sub(1).min(self.segments.len().saturating_sub(1))
    }

    /// Response at `x`, flat outside the knots.
    #[must_use]
    pub fn response(&self, x: f64) -> f64 {
        if self.segments.is_empty() {
            return f64::NAN;
        }
        let clamped = x.clamp(self.left_edge(), self.right_edge());
        self.segments[self.locate(clamped)].response(clamped)
    }

    /// Derivative of order 1 or 2 at `x`; zero outside the knots.
    pub fn derivative(&self, x: f64, order: usize) -> MathResult<f64> {
        if !(1..=2).contains(&order) {
            return Err(MathError::invalid_input(format!(
                "derivative order {order} is not supported"
            )));
        }
        if self.segments.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if x < self.left_edge() || x > self.right_edge() {
            return Ok(0.0);
        }
        Ok(self.segments[self.locate(x)].derivative(x, order))
    }

    /// Integral of the response over `[a, b]` (negated if `b < a`).
    #[must_use]
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        if b < a {
            return -self.integral(b, a);
        }
        if self.segments.is_empty() {
            return f64::NAN;
        }
        let (lo, hi) = (self.left_edge(), self.right_edge());
        let mut total = 0.0;
        if a < lo {
            total += self.left_response() * (b.min(lo) - a);
        }
        if b > hi {
            total += self.right_response() * (b - a.max(hi));
        }
        let (ia, ib) = (a.max(lo), b.min(hi));
        if ib > ia {
            for seg in &self.segments {
                let (sa, sb) = (ia.max(seg.left()), ib.min(seg.right()));
                if sb > sa {
                    total += seg.integral(sa, sb);
                }
            }
        }
        total
    }

    /// Total curvature `∫ y''² dx` across all segments.
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.segments.iter().map(Segment::curvature).sum()
    }
}

impl AsRef<Stretch> for Stretch {
    fn as_ref(&self) -> &Stretch {
        self
    }
}

/// Checks that `knots` has at least two strictly increasing finite entries.
pub fn validate_knots(knots: &[f64]) -> MathResult<()> {
    if knots.len() < 2 {
        return Err(MathError::insufficient_data(2, knots.len()));
    }
    for (i, &k) in knots.iter().enumerate() {
        if !k.is_finite() || (i > 0 && k <= knots[i - 1]) {
            return Err(MathError::NonIncreasingKnots { index: i, value: k });
        }
    }
    Ok(())
}
