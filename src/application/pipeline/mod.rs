//! Service pipeline - ordered phases with aggregated failure reporting.

mod context;
mod error;
mod service;

pub use context::{PipelineContext, PipelineScoped, WARNINGS_KEY};
pub use error::{PipelineError, PipelineErrorKind, CAUSE_KEY, OPERATION_KEY, REQUEST_ID_KEY};
pub use service::{Pipeline, ServicePipeline};
