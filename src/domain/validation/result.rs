//! Aggregatable validation outcomes.
//!
//! Independent checks append to a single `ValidationResult` so a caller
//! receives every violation in one response.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::domain::foundation::FieldError;

/// Whether an entry blocks the request or is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Lowercase tag used in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding.
///
/// `field` is `None` for cross-field or global violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    /// Creates a blocking entry.
    pub fn error(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            field: field.map(str::to_string),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates an informational entry.
    pub fn warning(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            field: field.map(str::to_string),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ordered collections of errors (blocking) and warnings (informational).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates an empty, valid result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a blocking entry.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.errors.push(ValidationError::error(field, message));
    }

    /// Appends an informational entry.
    pub fn add_warning(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.warnings.push(ValidationError::warning(field, message));
    }

    /// Appends a blocking entry derived from a value object construction error.
    pub fn add_field_error(&mut self, err: &FieldError) {
        self.add_error(Some(err.field()), err.to_string());
    }

    /// True iff no blocking entries were recorded. Warnings never count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Appends both lists of `other` after this result's entries.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Builder form of [`merge`](Self::merge).
    pub fn merged(mut self, other: ValidationResult) -> Self {
        self.merge(other);
        self
    }

    /// All error messages joined with `"; "`, in recording order.
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Warning messages in recording order.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.message.clone()).collect()
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}
