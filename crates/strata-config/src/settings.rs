//! Top-level configuration document.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::risk::{BumpConfig, ReplicationConfig, SimmConfig};

/// Every Strata setting in one document. Missing sections take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    /// Curve calibration.
    #[serde(default)]
    pub calibration: CalibrationConfig,
    /// Bumped curve families.
    #[serde(default)]
    pub bumping: BumpConfig,
    /// Bond replication.
    #[serde(default)]
    pub replication: ReplicationConfig,
    /// SIMM aggregation.
    #[serde(default)]
    pub simm: SimmConfig,
}

impl StrataConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            format: "toml",
            message: e.to_string(),
        })?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            format: "json",
            message: e.to_string(),
        })?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

impl Validate for StrataConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let sections: [(&str, Vec<ValidationError>); 4] = [
            ("calibration", self.calibration.validate()),
            ("bumping", self.bumping.validate()),
            ("replication", self.replication.validate()),
            ("simm", self.simm.validate()),
        ];
        sections
            .into_iter()
            .flat_map(|(name, errors)| errors.into_iter().map(move |e| e.nested(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_math::spline::SegmentBasis;

    #[test]
    fn test_partial_toml_takes_defaults() {
        let text = r#"
            [calibration]
            tolerance = 1e-11
            dense_tenor = "6M"

            [calibration.control]
            continuity = 1

            [calibration.control.basis]
            type = "hyperbolic_tension"
            tension = 2.0

            [simm]
            cross_curve_correlation = 0.95
        "#;
        let config = StrataConfig::from_toml_str(text).unwrap();
        assert_eq!(config.calibration.tolerance, 1e-11);
        assert_eq!(config.calibration.dense_tenor.to_string(), "6M");
        assert_eq!(
            config.calibration.control.basis,
            SegmentBasis::HyperbolicTension { tension: 2.0 }
        );
        assert_eq!(config.simm.cross_curve_correlation, 0.95);
        assert_eq!(config.bumping, BumpConfig::standard());
    }

    #[test]
    fn test_round_trip_toml_and_json() {
        let config = StrataConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(StrataConfig::from_toml_str(&text).unwrap(), config);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(StrataConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_document() {
        let err = StrataConfig::from_toml_str("[bumping]\nbump_bp = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("bumping.bump_bp"));
        assert!(matches!(
            StrataConfig::from_json_str("{not json"),
            Err(ConfigError::Parse { format: "json", .. })
        ));
    }
}
