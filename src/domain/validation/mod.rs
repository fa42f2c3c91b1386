//! Validation module - comprehensive validation results.

mod result;

pub use result::{Severity, ValidationError, ValidationResult};
