//! # Strata Config
//!
//! Serde-backed settings for every tunable part of Strata:
//!
//! - [`CalibrationConfig`]: solver tolerance, default segment control, DENSE tenor
//! - [`BumpConfig`]: bump size, parallel entry, data-parallel execution
//! - [`ReplicationConfig`]: effective-duration bump, recovery, yield solver
//! - [`SimmConfig`]: cross-curve correlation
//!
//! [`StrataConfig`] bundles them and loads from TOML or JSON. Every struct
//! implements [`Validate`].
//!
//! ```rust
//! use strata_config::{StrataConfig, Validate};
//!
//! let config = StrataConfig::from_toml_str("[bumping]\nbump_bp = 2.0\n").unwrap();
//! assert_eq!(config.bumping.bump_bp, 2.0);
//! assert!(config.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod calibration;
mod error;
mod risk;
mod settings;

pub use calibration::CalibrationConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use risk::{BumpConfig, ReplicationConfig, SimmConfig};
pub use settings::StrataConfig;
