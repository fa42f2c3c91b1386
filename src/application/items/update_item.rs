//! UpdateItem - replaces an item's message.
//!
//! Only the message changes. Owner, team and access level are fixed at
//! creation.

use std::sync::Arc;

use async_trait::async_trait;

use super::{check_item_access, check_item_key, check_message, load_item, ItemKey, ItemResponse};
use crate::application::pipeline::{PipelineContext, PipelineError, PipelineScoped, ServicePipeline};
use crate::config::ItemsConfig;
use crate::domain::authorization::AccessAction;
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::ItemRepository;

#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub user: User,
    pub owner_id: Option<String>,
    pub item_id: Option<String>,
    pub message: Option<String>,
}

impl UpdateItemRequest {
    pub fn new(user: User, item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user,
            owner_id: None,
            item_id: Some(item_id.into()),
            message: Some(message.into()),
        }
    }

    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

#[derive(Debug)]
pub struct UpdateItemContext {
    pipeline: PipelineContext,
    user: User,
    key: Option<ItemKey>,
    message: String,
    item: Option<Item>,
}

impl PipelineScoped for UpdateItemContext {
    fn pipeline(&self) -> &PipelineContext {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        &mut self.pipeline
    }
}

pub struct UpdateItemService {
    repository: Arc<dyn ItemRepository>,
    limits: ItemsConfig,
}

impl UpdateItemService {
    pub fn new(repository: Arc<dyn ItemRepository>, limits: ItemsConfig) -> Self {
        Self { repository, limits }
    }
}

#[async_trait]
impl ServicePipeline for UpdateItemService {
    type Request = UpdateItemRequest;
    type Context = UpdateItemContext;
    type Response = ItemResponse;

    fn operation(&self) -> &'static str {
        "update_item"
    }

    fn validate_input(&self, request: &UpdateItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_item_key(&mut result, request.owner_id.as_deref(), request.item_id.as_deref());
        check_message(&mut result, request.message.as_deref(), self.limits.max_message_length);
        result
    }

    fn create_context(
        &self,
        request: UpdateItemRequest,
        pipeline: PipelineContext,
    ) -> UpdateItemContext {
        let key = ItemKey::parse(
            &request.user,
            request.owner_id.as_deref(),
            request.item_id.as_deref(),
        );
        UpdateItemContext {
            pipeline,
            user: request.user,
            key,
            message: request.message.unwrap_or_default(),
            item: None,
        }
    }

    async fn decorate(&self, context: &mut UpdateItemContext) -> Result<(), PipelineError> {
        let key = ItemKey::require(context.key.as_ref())?;
        context.item = load_item(&self.repository, key).await?;
        Ok(())
    }

    fn validate_business(&self, context: &UpdateItemContext) -> ValidationResult {
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

    async fn persist(&self, context: &mut UpdateItemContext) -> Result<(), PipelineError> {
        let item = context
            .item
            .as_mut()
            .ok_or_else(|| PipelineError::unexpected("item missing after business validation"))?;
        item.update_message(context.message.clone())
            .map_err(PipelineError::unexpected_from)?;

        self.repository.update(item).await.map_err(|err| {
            PipelineError::persistence_failed("Failed to update item", err)
                .with_context("itemId", item.id().to_string())
        })?;

        tracing::info!(item_id = %item.id(), updated_by = %context.user.user_id(), "item updated");
        Ok(())
    }

    fn build_response(&self, context: UpdateItemContext) -> Result<ItemResponse, PipelineError> {
        let item = context
            .item
            .clone()
            .ok_or_else(|| PipelineError::unexpected("item missing after persistence"))?;
        Ok(ItemResponse::new(&context.pipeline, item))
    }
}
