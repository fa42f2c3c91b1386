//! Per-execution pipeline context.
//!
//! A `PipelineContext` is created fresh for every execution and carries
//! the request id plus a small metadata bag used to pass warnings and
//! decoration-derived data forward to response building. It is never
//! shared across executions.

use serde_json::Value;
use std::collections::HashMap;

use crate::domain::foundation::RequestId;
use crate::domain::validation::ValidationError;

/// Metadata key under which non-blocking validation warnings are stored.
pub const WARNINGS_KEY: &str = "warnings";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    request_id: RequestId,
    metadata: HashMap<String, Value>,
}

impl PipelineContext {
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            metadata: HashMap::new(),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn metadata_map(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    /// Appends warning messages to the `warnings` metadata entry.
    pub fn add_warnings<'a>(&mut self, warnings: impl IntoIterator<Item = &'a ValidationError>) {
        let mut incoming = warnings
            .into_iter()
            .map(|w| Value::String(w.to_string()))
            .peekable();
        if incoming.peek().is_none() {
            return;
        }

        let entry = self
            .metadata
            .entry(WARNINGS_KEY.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(list) => list.extend(incoming),
            other => {
                let mut list = vec![other.take()];
                list.extend(incoming);
                *other = Value::Array(list);
            }
        }
    }

    /// Warning messages recorded so far, in order.
    pub fn warnings(&self) -> Vec<String> {
        match self.metadata.get(WARNINGS_KEY) {
            Some(Value::Array(list)) => list
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        }
    }
}

/// Typed per-endpoint contexts embed a `PipelineContext`.
///
/// The orchestrator only needs access to the embedded context; everything
/// else in a typed context belongs to the endpoint.
pub trait PipelineScoped {
    fn pipeline(&self) -> &PipelineContext;
    fn pipeline_mut(&mut self) -> &mut PipelineContext;

    fn request_id(&self) -> &RequestId {
        self.pipeline().request_id()
    }
}

impl PipelineScoped for PipelineContext {
    fn pipeline(&self) -> &PipelineContext {
        self
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        self
    }
}
