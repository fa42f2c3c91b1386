//! CreateItem - stores a new item for the caller.

use std::sync::Arc;

use async_trait::async_trait;

use super::{check_message, ItemResponse};
use crate::application::pipeline::{PipelineContext, PipelineError, PipelineScoped, ServicePipeline};
use crate::config::ItemsConfig;
use crate::domain::authorization::is_valid_team_assignment;
use crate::domain::foundation::TeamId;
use crate::domain::item::{AccessLevel, Item, ItemDraft};
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::ItemRepository;

/// Raw create request.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub user: User,
    pub message: Option<String>,
    /// `INDIVIDUAL`, `TEAM` or `PUBLIC`, any case. Defaults to `INDIVIDUAL`.
    pub access_level: Option<String>,
    pub team_id: Option<String>,
}

impl CreateItemRequest {
    pub fn new(user: User, message: impl Into<String>) -> Self {
        Self {
            user,
            message: Some(message.into()),
            access_level: None,
            team_id: None,
        }
    }

    pub fn with_access_level(mut self, access_level: impl Into<String>) -> Self {
        self.access_level = Some(access_level.into());
        self
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }
}

#[derive(Debug)]
pub struct CreateItemContext {
    pipeline: PipelineContext,
    user: User,
    message: String,
    access_level: AccessLevel,
    team_id: Option<TeamId>,
    owned_items: u64,
    item: Option<Item>,
}

impl CreateItemContext {
    pub fn owned_items(&self) -> u64 {
        self.owned_items
    }
}

impl PipelineScoped for CreateItemContext {
    fn pipeline(&self) -> &PipelineContext {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        &mut self.pipeline
    }
}

/// Handler for creating items.
pub struct CreateItemService {
    repository: Arc<dyn ItemRepository>,
    limits: ItemsConfig,
}

impl CreateItemService {
    pub fn new(repository: Arc<dyn ItemRepository>, limits: ItemsConfig) -> Self {
        Self { repository, limits }
    }
}

#[async_trait]
impl ServicePipeline for CreateItemService {
    type Request = CreateItemRequest;
    type Context = CreateItemContext;
    type Response = ItemResponse;

    fn operation(&self) -> &'static str {
        "create_item"
    }

    fn validate_input(&self, request: &CreateItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_message(&mut result, request.message.as_deref(), self.limits.max_message_length);

        let access_level = match request.access_level.as_deref() {
            None => Some(AccessLevel::default()),
            Some(raw) => match raw.parse::<AccessLevel>() {
                Ok(level) => Some(level),
                Err(err) => {
                    result.add_field_error(&err);
                    None
                }
            },
        };
        if let Some(Err(err)) = request.team_id.as_deref().map(TeamId::new) {
            result.add_field_error(&err);
        }

        match (access_level, request.team_id.is_some()) {
            (Some(AccessLevel::Team), false) => {
                result.add_error(Some("team_id"), "Team items require a team_id")
            }
            (Some(AccessLevel::Individual | AccessLevel::Public), true) => {
                result.add_error(Some("team_id"), "Only team items may name a team_id")
            }
            _ => {}
        }
        result
    }

    fn create_context(
        &self,
        request: CreateItemRequest,
        pipeline: PipelineContext,
    ) -> CreateItemContext {
        // Both parses succeeded in validate_input.
        let access_level = request
            .access_level
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let team_id = request.team_id.and_then(|raw| TeamId::new(raw).ok());

        CreateItemContext {
            pipeline,
            user: request.user,
            message: request.message.unwrap_or_default(),
            access_level,
            team_id,
            owned_items: 0,
            item: None,
        }
    }

    async fn decorate(&self, context: &mut CreateItemContext) -> Result<(), PipelineError> {
        let owned = self
            .repository
            .count_by_owner(context.user.user_id())
            .await
            .map_err(|err| PipelineError::decoration_failed("Failed to count items", err))?;
        context.owned_items = owned;
        context.pipeline.insert_metadata("ownedItems", owned);
        Ok(())
    }

    fn validate_business(&self, context: &CreateItemContext) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !is_valid_team_assignment(&context.user, context.team_id.as_ref()) {
            let team = context.team_id.as_ref().map(TeamId::as_str).unwrap_or_default();
            result.add_error(Some("team_id"), format!("Not a member of team {}", team));
        }

        let quota = self.limits.max_items_per_user;
        if context.owned_items >= quota {
            result.add_error(None, format!("Item quota of {} reached", quota));
        } else if context.owned_items + 1 >= self.limits.quota_warning_threshold() {
            result.add_warning(
                None,
                format!("{} of {} items used", context.owned_items + 1, quota),
            );
        }
        result
    }

    fn requires_persistence(&self) -> bool {
        true
    }

    async fn persist(&self, context: &mut CreateItemContext) -> Result<(), PipelineError> {
        let item = ItemDraft::new(context.user.user_id().clone(), context.message.clone())
            .access_level(context.access_level)
            .team_id(context.team_id.clone())
            .build()
            .map_err(PipelineError::unexpected_from)?;

        self.repository.put(&item).await.map_err(|err| {
            PipelineError::persistence_failed("Failed to store item", err)
                .with_context("itemId", item.id().to_string())
        })?;

        tracing::info!(item_id = %item.id(), access_level = %item.access_level(), "item created");
        context.item = Some(item);
        Ok(())
    }

    fn build_response(&self, context: CreateItemContext) -> Result<ItemResponse, PipelineError> {
        let item = context
            .item
            .clone()
            .ok_or_else(|| PipelineError::unexpected("item was not persisted"))?;
        Ok(ItemResponse::new(&context.pipeline, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryItemRepository;
    use crate::application::pipeline::{Pipeline, PipelineErrorKind};
    use crate::domain::foundation::{DomainError, ErrorCode, UserId};
    use crate::domain::user::Role;

    fn user(id: &str, role: Role, teams: &[&str]) -> User {
        User::new(
            UserId::new(id).unwrap(),
            id,
            format!("{}@example.com", id),
            role,
            teams.iter().map(|t| TeamId::new(*t).unwrap()),
        )
    }

    fn service_with(
        repo: Arc<InMemoryItemRepository>,
        limits: ItemsConfig,
    ) -> Pipeline<CreateItemService> {
        Pipeline::new(CreateItemService::new(repo, limits))
    }

    #[tokio::test]
    async fn creates_individual_item_by_default() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let pipeline = service_with(repo.clone(), ItemsConfig::default());

        let response = pipeline
            .execute(CreateItemRequest::new(user("alice", Role::User, &[]), "hello"))
            .await
            .unwrap();

        assert_eq!(response.item.message(), "hello");
        assert!(response.item.is_individual());
        assert_eq!(response.item.created_at(), response.item.updated_at());
        assert!(response.warnings.is_empty());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn creates_team_item_for_member() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let pipeline = service_with(repo, ItemsConfig::default());
        let request = CreateItemRequest::new(user("alice", Role::User, &["engineering"]), "standup")
            .with_access_level("team")
            .with_team("engineering");

        let response = pipeline.execute(request).await.unwrap();

        assert!(response.item.is_team_item());
        assert_eq!(response.item.team_id().unwrap().as_str(), "engineering");
    }

    #[test]
    fn input_collects_every_violation() {
        let service =
            CreateItemService::new(Arc::new(InMemoryItemRepository::new()), ItemsConfig::default());
        let request = CreateItemRequest {
            user: user("alice", Role::User, &[]),
            message: None,
            access_level: Some("secret".to_string()),
            team_id: None,
        };

        let result = service.validate_input(&request);

        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn input_checks_team_combination() {
        let service =
            CreateItemService::new(Arc::new(InMemoryItemRepository::new()), ItemsConfig::default());
        let alice = user("alice", Role::User, &["engineering"]);

        let team_without_id = service
            .validate_input(&CreateItemRequest::new(alice.clone(), "x").with_access_level("TEAM"));
        let public_with_team = service.validate_input(
            &CreateItemRequest::new(alice, "x")
                .with_access_level("PUBLIC")
                .with_team("engineering"),
        );

        assert_eq!(team_without_id.errors()[0].field.as_deref(), Some("team_id"));
        assert_eq!(public_with_team.errors()[0].field.as_deref(), Some("team_id"));
    }

    #[tokio::test]
    async fn non_member_cannot_create_team_item() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let pipeline = service_with(repo.clone(), ItemsConfig::default());
        let request = CreateItemRequest::new(user("alice", Role::User, &["marketing"]), "x")
            .with_access_level("TEAM")
            .with_team("engineering");

        let err = pipeline.execute(request).await.unwrap_err();

        assert_eq!(err.kind(), PipelineErrorKind::Validation);
        assert_eq!(err.message(), "Not a member of team engineering");
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn admin_may_create_for_any_team() {
        let pipeline =
            service_with(Arc::new(InMemoryItemRepository::new()), ItemsConfig::default());
        let request = CreateItemRequest::new(user("root", Role::Admin, &[]), "x")
            .with_access_level("TEAM")
            .with_team("finance");

        assert!(pipeline.execute(request).await.is_ok());
    }

    #[tokio::test]
    async fn quota_warning_then_rejection() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let limits = ItemsConfig {
            max_items_per_user: 2,
            quota_warning_ratio: 0.5,
            ..ItemsConfig::default()
        };
        let pipeline = service_with(repo.clone(), limits);
        let alice = user("alice", Role::User, &[]);

        let first = pipeline.execute(CreateItemRequest::new(alice.clone(), "one")).await.unwrap();
        let second = pipeline.execute(CreateItemRequest::new(alice.clone(), "two")).await.unwrap();
        let third = pipeline.execute(CreateItemRequest::new(alice, "three")).await.unwrap_err();

        assert_eq!(first.warnings, vec!["1 of 2 items used".to_string()]);
        assert_eq!(second.warnings, vec!["2 of 2 items used".to_string()]);
        assert_eq!(third.message(), "Item quota of 2 reached");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn storage_failure_during_count_is_decoration_failure() {
        let repo = Arc::new(InMemoryItemRepository::new());
        repo.fail_with(DomainError::new(ErrorCode::DatabaseError, "timeout")).await;
        let pipeline = service_with(repo, ItemsConfig::default());

        let err = pipeline
            .execute(CreateItemRequest::new(user("alice", Role::User, &[]), "x"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), PipelineErrorKind::Decoration);
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.context_value("operation"), Some("create_item"));
    }
}
