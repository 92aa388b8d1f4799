//! # Strata Math
//!
//! Mathematical utilities for the Strata curve and risk library.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent and a secant/bracketing hybrid
//! - **Linear Algebra**: dense solves and equality-constrained quadratic minimization
//! - **Splines**: segment bases (polynomial, Kaklis-Pandelis, KLK tension),
//!   multi-segment stretches, shape-preserving sequential calibration,
//!   global and local smoothing fits
//! - **Numerics**: tolerance comparison, NaN screening, Gauss-Legendre quadrature

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod linear_algebra;
pub mod numerics;
pub mod solvers;
pub mod spline;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::numerics::{triplet_has_nan, within_tolerance};
    pub use crate::solvers::{brent, find_root, SolverConfig, SolverResult};
    pub use crate::spline::{
        BoundaryCondition, C1Generator, LocalControl, SegmentBasis, SegmentControl,
        SequentialCalibrator, Stretch,
    };
}

pub use error::{MathError, MathResult};
