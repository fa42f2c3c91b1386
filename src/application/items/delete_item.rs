//! DeleteItem - removes an item the caller may modify.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{check_item_access, check_item_key, load_item, ItemKey};
use crate::application::pipeline::{PipelineContext, PipelineError, PipelineScoped, ServicePipeline};
use crate::domain::authorization::AccessAction;
use crate::domain::foundation::ItemId;
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::ItemRepository;

#[derive(Debug, Clone)]
pub struct DeleteItemRequest {
    pub user: User,
    pub owner_id: Option<String>,
    pub item_id: Option<String>,
}

impl DeleteItemRequest {
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
pub struct DeleteItemContext {
    pipeline: PipelineContext,
    user: User,
    key: Option<ItemKey>,
    item: Option<Item>,
}

impl PipelineScoped for DeleteItemContext {
    fn pipeline(&self) -> &PipelineContext {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        &mut self.pipeline
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteItemResponse {
    pub request_id: String,
    pub item_id: ItemId,
}

pub struct DeleteItemService {
    repository: Arc<dyn ItemRepository>,
}

impl DeleteItemService {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ServicePipeline for DeleteItemService {
    type Request = DeleteItemRequest;
    type Context = DeleteItemContext;
    type Response = DeleteItemResponse;

    fn operation(&self) -> &'static str {
        "delete_item"
    }

    fn validate_input(&self, request: &DeleteItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_item_key(&mut result, request.owner_id.as_deref(), request.item_id.as_deref());
        result
    }

    fn create_context(
        &self,
        request: DeleteItemRequest,
        pipeline: PipelineContext,
    ) -> DeleteItemContext {
        let key = ItemKey::parse(
            &request.user,
            request.owner_id.as_deref(),
            request.item_id.as_deref(),
        );
        DeleteItemContext {
            pipeline,
            user: request.user,
            key,
            item: None,
        }
    }

    async fn decorate(&self, context: &mut DeleteItemContext) -> Result<(), PipelineError> {
        let key = ItemKey::require(context.key.as_ref())?;
        context.item = load_item(&self.repository, key).await?;
        Ok(())
    }

    fn validate_business(&self, context: &DeleteItemContext) -> ValidationResult {
        check_item_access(
            &context.pipeline,
            &context.user,
            context.key.as_ref(),
            context.item.as_ref(),
            AccessAction::Modify,
        )
    }

    fn requires_persistence(&self) -> bool {
        true
    }

    async fn persist(&self, context: &mut DeleteItemContext) -> Result<(), PipelineError> {
        let key = ItemKey::require(context.key.as_ref())?;
        self.repository.delete(&key.owner, &key.id).await.map_err(|err| {
            PipelineError::persistence_failed("Failed to delete item", err)
                .with_context("itemId", key.id.to_string())
        })?;

        tracing::info!(item_id = %key.id, deleted_by = %context.user.user_id(), "item deleted");
        Ok(())
    }

    fn build_response(
        &self,
        context: DeleteItemContext,
    ) -> Result<DeleteItemResponse, PipelineError> {
        let key = ItemKey::require(context.key.as_ref())?;
        Ok(DeleteItemResponse {
            request_id: context.request_id().to_string(),
            item_id: key.id,
        })
    }
}
