//! The service pipeline template and its orchestrator.
//!
//! Each endpoint implements [`ServicePipeline`] once; [`Pipeline`] runs the
//! phases in a fixed order and owns failure propagation:
//!
//! ```text
//! Start -> InputValidated -> ContextBuilt -> Decorated
//!       -> BusinessValidated -> [Persisted] -> ResponseBuilt
//! ```
//!
//! Any phase may end the execution with a `PipelineError`. There is no
//! retry inside the pipeline; deadlines and cancellation belong to the
//! caller and collaborators.

use async_trait::async_trait;
use tracing::Instrument;

use super::context::{PipelineContext, PipelineScoped};
use super::error::{PipelineError, PipelineErrorKind, OPERATION_KEY, REQUEST_ID_KEY};
use crate::domain::foundation::RequestId;
use crate::domain::validation::ValidationResult;

/// One endpoint's request/context/response triple and its phases.
///
/// Only `operation`, `create_context` and `build_response` are required.
/// Services that write must return `true` from `requires_persistence`;
/// otherwise `persist` is never called.
#[async_trait]
pub trait ServicePipeline: Send + Sync {
    type Request: Send;
    type Context: PipelineScoped + Send + Sync;
    type Response: Send;

    /// Operation name used in logs and error context.
    fn operation(&self) -> &'static str;

    /// Phase 1: structural checks on the raw request. Collect every
    /// violation; do not stop at the first.
    fn validate_input(&self, _request: &Self::Request) -> ValidationResult {
        ValidationResult::new()
    }

    /// Phase 2: build the typed context.
    fn create_context(&self, request: Self::Request, pipeline: PipelineContext) -> Self::Context;

    /// Phase 3: enrich the context from collaborators.
    async fn decorate(&self, _context: &mut Self::Context) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Phase 4: rules that need the decorated context. Must not mutate
    /// anything, so running it twice gives the same result.
    fn validate_business(&self, _context: &Self::Context) -> ValidationResult {
        ValidationResult::new()
    }

    fn requires_persistence(&self) -> bool {
        false
    }

    /// Phase 5: write through the storage collaborator.
    async fn persist(&self, _context: &mut Self::Context) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Phase 6: shape the response from the final context.
    fn build_response(&self, context: Self::Context) -> Result<Self::Response, PipelineError>;
}

/// Runs a [`ServicePipeline`] phase by phase.
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    service: S,
}

impl<S: ServicePipeline> Pipeline<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Executes the pipeline under a freshly generated request id.
    pub async fn execute(&self, request: S::Request) -> Result<S::Response, PipelineError> {
        self.execute_with_request_id(request, RequestId::generate())
            .await
    }

    /// Executes the pipeline under a request id supplied by the caller.
    ///
    /// Every error returned carries `requestId` and `operation` context.
    pub async fn execute_with_request_id(
        &self,
        request: S::Request,
        request_id: RequestId,
    ) -> Result<S::Response, PipelineError> {
        let operation = self.service.operation();
        let span = tracing::info_span!("pipeline", operation, request_id = %request_id);

        self.run(request, request_id.clone())
            .instrument(span.clone())
            .await
            .map_err(|mut err| {
                err.add_context_if_missing(REQUEST_ID_KEY, request_id.as_str());
                err.add_context_if_missing(OPERATION_KEY, operation);
                span.in_scope(|| report(&err));
                err
            })
    }

    async fn run(
        &self,
        request: S::Request,
        request_id: RequestId,
    ) -> Result<S::Response, PipelineError> {
        let input = self.service.validate_input(&request);
        if !input.is_valid() {
            return Err(PipelineError::validation(input));
        }
        tracing::debug!("input validated");

        let mut context = self
            .service
            .create_context(request, PipelineContext::new(request_id));
        tracing::debug!("context created");

        self.service
            .decorate(&mut context)
            .await
            .map_err(|err| err.within_phase(PipelineErrorKind::Decoration))?;
        tracing::debug!("context decorated");

        let business = self.service.validate_business(&context);
        if !business.is_valid() {
            return Err(PipelineError::validation(input.merged(business)));
        }
        let pipeline = context.pipeline_mut();
        pipeline.add_warnings(input.warnings());
        pipeline.add_warnings(business.warnings());
        tracing::debug!(warnings = business.warnings().len(), "business rules validated");

        if self.service.requires_persistence() {
            self.service
                .persist(&mut context)
                .await
                .map_err(|err| err.within_phase(PipelineErrorKind::Persistence))?;
            tracing::debug!("persisted");
        }

        let response = self.service.build_response(context)?;
        tracing::debug!("response built");
        Ok(response)
    }
}

fn report(err: &PipelineError) {
    match err.kind() {
        PipelineErrorKind::Validation => {
            tracing::info!(error = %err, "request rejected");
        }
        PipelineErrorKind::Decoration | PipelineErrorKind::Persistence => {
            tracing::warn!(error = %err, context = ?err.context(), "pipeline failed");
        }
        PipelineErrorKind::Unexpected => {
            tracing::error!(error = %err, context = ?err.context(), "pipeline failed unexpectedly");
        }
    }
}
