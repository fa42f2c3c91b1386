//! Pipeline failures.
//!
//! Every failure leaving the pipeline is a `PipelineError` tagged with the
//! phase family that produced it and a string context map for tracing.
//! Context keys set by the failing phase are never overwritten by the
//! orchestrator (`add_context_if_missing`).

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::validation::ValidationResult;

/// Context key for the execution's request id.
pub const REQUEST_ID_KEY: &str = "requestId";
/// Context key for the failing operation's name.
pub const OPERATION_KEY: &str = "operation";
/// Context key for the collaborator error code behind a failure.
pub const CAUSE_KEY: &str = "cause";

/// Which family of failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    /// Input or business rules rejected the request (phases 1 and 4).
    Validation,
    /// A collaborator needed to enrich the context failed (phase 3).
    Decoration,
    /// A write to storage failed (phase 5).
    Persistence,
    /// Anything else.
    Unexpected,
}

impl PipelineErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineErrorKind::Validation => "validation",
            PipelineErrorKind::Decoration => "decoration",
            PipelineErrorKind::Persistence => "persistence",
            PipelineErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[error("{kind} failure: {message}")]
pub struct PipelineError {
    kind: PipelineErrorKind,
    message: String,
    context: BTreeMap<String, String>,
    validation: Option<ValidationResult>,
    code: Option<ErrorCode>,
    #[source]
    source: Option<BoxedSource>,
}

impl PipelineError {
    fn new(kind: PipelineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: BTreeMap::new(),
            validation: None,
            code: None,
            source: None,
        }
    }

    /// Rejection carrying every collected violation.
    ///
    /// The message is all error messages joined with `"; "`.
    pub fn validation(result: ValidationResult) -> Self {
        let mut err = Self::new(PipelineErrorKind::Validation, result.error_message());
        err.validation = Some(result);
        err
    }

    pub fn decoration(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Decoration, message)
    }

    /// Decoration failure caused by a collaborator error.
    pub fn decoration_failed(message: impl Into<String>, cause: DomainError) -> Self {
        Self::decoration(message).caused_by(cause)
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Persistence, message)
    }

    /// Persistence failure caused by a collaborator error.
    pub fn persistence_failed(message: impl Into<String>, cause: DomainError) -> Self {
        Self::persistence(message).caused_by(cause)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Unexpected, message)
    }

    /// Wraps an arbitrary error as an unexpected failure.
    pub fn unexpected_from<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut wrapped = Self::unexpected(err.to_string());
        wrapped.source = Some(Box::new(err));
        wrapped
    }

    fn caused_by(mut self, cause: DomainError) -> Self {
        self.code = Some(cause.code);
        self.context
            .entry(CAUSE_KEY.to_string())
            .or_insert_with(|| cause.code.to_string());
        self.source = Some(Box::new(cause));
        self
    }

    /// Sets a context entry, replacing any previous value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a context entry only if the key is not present yet.
    pub fn add_context_if_missing(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Re-tags an `Unexpected` failure raised inside a phase with that
    /// phase's kind. Explicitly classified failures are left alone.
    pub(crate) fn within_phase(mut self, kind: PipelineErrorKind) -> Self {
        if self.kind == PipelineErrorKind::Unexpected {
            self.kind = kind;
        }
        self
    }

    pub fn kind(&self) -> PipelineErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Structured violations, present for validation failures.
    pub fn validation_result(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    /// Collaborator error code behind this failure, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn is_validation(&self) -> bool {
        self.kind == PipelineErrorKind::Validation
    }

    /// True if the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        self.is_validation()
    }

    /// True if the failure was caused by a missing record.
    pub fn is_not_found(&self) -> bool {
        self.code.is_some_and(|code| code.is_not_found())
    }

    /// Message safe to show to the caller.
    ///
    /// Validation failures expose their full message; everything else is
    /// reported generically so collaborator details do not leak.
    pub fn public_message(&self) -> String {
        match self.kind {
            PipelineErrorKind::Validation => self.message.clone(),
            PipelineErrorKind::Persistence if self.is_not_found() => "Item not found".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<DomainError> for PipelineError {
    fn from(err: DomainError) -> Self {
        let message = err.message.clone();
        Self::unexpected(message).caused_by(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(messages: &[&str]) -> ValidationResult {
        let mut result = ValidationResult::new();
        for message in messages {
            result.add_error(None, *message);
        }
        result
    }

    #[test]
    fn validation_error_joins_messages() {
        let err = PipelineError::validation(invalid(&["Message is required", "Limit too large"]));

        assert_eq!(err.kind(), PipelineErrorKind::Validation);
        assert_eq!(err.message(), "Message is required; Limit too large");
        assert_eq!(err.validation_result().unwrap().errors().len(), 2);
        assert!(err.is_client_error());
    }

    #[test]
    fn add_context_if_missing_keeps_existing_value() {
        let mut err =
            PipelineError::decoration("lookup failed").with_context(OPERATION_KEY, "inner");

        err.add_context_if_missing(OPERATION_KEY, "outer");
        err.add_context_if_missing(REQUEST_ID_KEY, "req-1");

        assert_eq!(err.context_value(OPERATION_KEY), Some("inner"));
        assert_eq!(err.context_value(REQUEST_ID_KEY), Some("req-1"));
    }

    #[test]
    fn persistence_failed_records_cause() {
        let err = PipelineError::persistence_failed(
            "Failed to update item",
            DomainError::new(ErrorCode::ItemNotFound, "gone"),
        );

        assert_eq!(err.code(), Some(ErrorCode::ItemNotFound));
        assert_eq!(err.context_value(CAUSE_KEY), Some("ITEM_NOT_FOUND"));
        assert!(err.is_not_found());
        assert!(err.source().is_some());
        assert_eq!(err.public_message(), "Item not found");
    }

    #[test]
    fn infrastructure_failures_hide_details() {
        let err = PipelineError::persistence_failed(
            "Failed to write",
            DomainError::new(ErrorCode::DatabaseError, "connection reset by 10.0.0.7"),
        );

        assert!(!err.is_client_error());
        assert!(!err.is_not_found());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn domain_error_converts_to_unexpected() {
        let err: PipelineError = DomainError::new(ErrorCode::DatabaseError, "boom").into();
        assert_eq!(err.kind(), PipelineErrorKind::Unexpected);
        assert_eq!(err.code(), Some(ErrorCode::DatabaseError));
    }

    #[test]
    fn within_phase_only_retags_unexpected() {
        let retagged = PipelineError::unexpected("x").within_phase(PipelineErrorKind::Decoration);
        let kept = PipelineError::validation(invalid(&["y"]))
            .within_phase(PipelineErrorKind::Decoration);

        assert_eq!(retagged.kind(), PipelineErrorKind::Decoration);
        assert_eq!(kept.kind(), PipelineErrorKind::Validation);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = PipelineError::decoration("directory unavailable");
        assert_eq!(err.to_string(), "decoration failure: directory unavailable");
    }

    #[test]
    fn unexpected_from_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = PipelineError::unexpected_from(io);

        assert_eq!(err.kind(), PipelineErrorKind::Unexpected);
        assert_eq!(err.message(), "disk full");
        assert!(err.source().is_some());
    }
}
