//! Spline stretches: segment bases, design controls, and the three ways a
//! stretch gets built.
//!
//! - [`SequentialCalibrator`]: shape-preserving, left to right, each segment
//!   solved so a caller-supplied residual vanishes
//! - [`Stretch::global_fit`]: one system across all knots (global smoothing)
//! - [`Stretch::local_fit`]: Hermite segments with local slopes (local smoothing)

mod basis;
mod control;
mod global;
mod local;
mod segment;
mod sequential;
mod stretch;

pub use basis::SegmentBasis;
pub use control::{BoundaryCondition, SegmentControl};
pub use local::{C1Generator, LocalControl};
pub use segment::Segment;
pub use sequential::SequentialCalibrator;
pub use stretch::{validate_knots, Stretch};
