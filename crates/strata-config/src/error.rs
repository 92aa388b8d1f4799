//! Configuration errors and validation.

use std::fmt;

use thiserror::Error;

/// A specialized Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("Failed to parse {format} configuration: {message}")]
    Parse {
        /// "toml" or "json".
        format: &'static str,
        /// Parser message.
        message: String,
    },

    /// Serialization failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// A single field failed validation.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// Field path.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// Several fields failed validation.
    #[error("Validation failed: {}", format_errors(.0))]
    MultipleValidationErrors(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefixes the field path with a parent section.
    #[must_use]
    pub fn nested(self, parent: &str) -> Self {
        Self {
            field: format!("{parent}.{}", self.field),
            message: self.message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for configuration types that can be validated.
pub trait Validate {
    /// Returns every validation failure, empty when valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

/// Pushes an error unless `value` is finite and strictly positive.
pub(crate) fn require_positive(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ValidationError::new(field, format!("must be positive, got {value}")));
    }
}
