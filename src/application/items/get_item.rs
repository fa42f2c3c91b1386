//! GetItem - reads one item the caller may see.

use std::sync::Arc;

use async_trait::async_trait;

use super::{check_item_access, check_item_key, load_item, ItemKey, ItemResponse};
use crate::application::pipeline::{PipelineContext, PipelineError, PipelineScoped, ServicePipeline};
use crate::domain::authorization::AccessAction;
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::ItemRepository;

#[derive(Debug, Clone)]
pub struct GetItemRequest {
    pub user: User,
    /// Owner of the item; the caller when absent.
    pub owner_id: Option<String>,
    pub item_id: Option<String>,
}

impl GetItemRequest {
    pub fn new(user: User, item_id: impl Into<String>) -> Self {
        Self {
            user,
            owner_id: None,
            item_id: Some(item_id.into()),
        }
    }

    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

#[derive(Debug)]
pub struct GetItemContext {
    pipeline: PipelineContext,
    user: User,
    key: Option<ItemKey>,
    item: Option<Item>,
}

impl PipelineScoped for GetItemContext {
    fn pipeline(&self) -> &PipelineContext {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        &mut self.pipeline
    }
}

pub struct GetItemService {
    repository: Arc<dyn ItemRepository>,
}

impl GetItemService {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ServicePipeline for GetItemService {
    type Request = GetItemRequest;
    type Context = GetItemContext;
    type Response = ItemResponse;

    fn operation(&self) -> &'static str {
        "get_item"
    }

    fn validate_input(&self, request: &GetItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_item_key(&mut result, request.owner_id.as_deref(), request.item_id.as_deref());
        result
    }

    fn create_context(&self, request: GetItemRequest, pipeline: PipelineContext) -> GetItemContext {
        let key = ItemKey::parse(
            &request.user,
            request.owner_id.as_deref(),
            request.item_id.as_deref(),
        );
        GetItemContext {
            pipeline,
            user: request.user,
            key,
            item: None,
        }
    }

    async fn decorate(&self, context: &mut GetItemContext) -> Result<(), PipelineError> {
        let key = ItemKey::require(context.key.as_ref())?;
        context.item = load_item(&self.repository, key).await?;
        Ok(())
    }

    fn validate_business(&self, context: &GetItemContext) -> ValidationResult {
        check_item_access(
            &context.pipeline,
            &context.user,
            context.key.as_ref(),
            context.item.as_ref(),
            AccessAction::Read,
        )
    }

    fn build_response(&self, context: GetItemContext) -> Result<ItemResponse, PipelineError> {
        let item = context
            .item
            .clone()
            .ok_or_else(|| PipelineError::unexpected("item missing after business validation"))?;
        Ok(ItemResponse::new(&context.pipeline, item))
    }
}
