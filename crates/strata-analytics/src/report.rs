//! Insertion-ordered named-field reports.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::Date;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Tenor label to value, in the instrument order of the curve it came from.
pub type TenorValues = Vec<(String, f64)>;

/// Value of one report field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A single number.
    Scalar(f64),
    /// A date.
    Date(Date),
    /// One number per tenor.
    TenorMap(TenorValues),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v:.10}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::TenorMap(values) => {
                let parts: Vec<String> = values.iter().map(|(k, v)| format!("{k}={v:.6}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// A named value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    name: String,
    value: FieldValue,
}

impl NamedField {
    /// Creates a field; the name must be non-empty with no surrounding whitespace.
    pub fn new(name: impl Into<String>, value: FieldValue) -> AnalyticsResult<Self> {
        let name = name.into();
        if name.is_empty() || name.trim() != name {
            return Err(AnalyticsError::InvalidFieldName(name));
        }
        Ok(Self { name, value })
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// Fields in insertion order with unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedFieldMap {
    fields: Vec<NamedField>,
}

impl NamedFieldMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Fails on a duplicate or invalid name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> AnalyticsResult<()> {
        let field = NamedField::new(name, value)?;
        if self.get(field.name()).is_some() {
            return Err(AnalyticsError::DuplicateField(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    /// The value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// A scalar field.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FieldValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// A date field.
    pub fn date(&self, name: &str) -> Option<Date> {
        match self.get(name)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// A tenor map field.
    pub fn tenor_map(&self, name: &str) -> Option<&[(String, f64)]> {
        match self.get(name)? {
            FieldValue::TenorMap(values) => Some(values),
            _ => None,
        }
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(NamedField::name)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedField> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field was inserted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An optional metric that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Field that is absent.
    pub field: String,
    /// Why.
    pub message: String,
}

/// The output of one bond replication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondReplicationRun {
    fields: NamedFieldMap,
    diagnostics: Vec<Diagnostic>,
}

impl BondReplicationRun {
    /// An empty run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> AnalyticsResult<()> {
        self.fields.insert(name, value)
    }

    /// Records why an optional field is absent.
    pub fn record(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            field: field.into(),
            message: message.into(),
        };
        log::warn!("{} unavailable: {}", diagnostic.field, diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// The fields.
    pub fn fields(&self) -> &NamedFieldMap {
        &self.fields
    }

    /// Absent optional fields.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for BondReplicationRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.fields.iter() {
            writeln!(f, "{:<40} {}", field.name(), field.value())?;
        }
        for d in &self.diagnostics {
            writeln!(f, "{:<40} n/a ({})", d.field, d.message)?;
        }
        Ok(())
    }
}
