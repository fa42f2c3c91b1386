//! Application layer - the service pipeline and the endpoints built on it.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every endpoint runs through [`pipeline::Pipeline`]; read endpoints never
//! reach the persistence phase.

pub mod identity;
pub mod items;
pub mod pipeline;

pub use identity::IdentityResolver;
pub use items::{
    CreateItemRequest, CreateItemService, DeleteItemRequest, DeleteItemResponse, DeleteItemService,
    GetItemRequest, GetItemService, ItemResponse, ListItemsRequest, ListItemsResponse,
    ListItemsService, UpdateItemRequest, UpdateItemService,
};
pub use pipeline::{Pipeline, PipelineContext, PipelineError, PipelineErrorKind, ServicePipeline};
