//! Integration tests for the item endpoints.
//!
//! These tests drive the full flow a transport layer would:
//! 1. Configuration seeds the directory
//! 2. Verified claims are resolved to a `User`
//! 3. The endpoint pipeline validates, decorates, authorizes and persists
//!
//! Uses the in-memory adapters, so no external services are needed.

use std::sync::Arc;

use item_service::adapters::{InMemoryDirectory, InMemoryItemRepository};
use item_service::application::items::{
    CreateItemRequest, CreateItemService, DeleteItemRequest, DeleteItemService, GetItemRequest,
    GetItemService, ListItemsRequest, ListItemsService, UpdateItemRequest, UpdateItemService,
};
use item_service::application::pipeline::{
    Pipeline, PipelineErrorKind, ServicePipeline, OPERATION_KEY, REQUEST_ID_KEY,
};
use item_service::application::IdentityResolver;
use item_service::config::{AppConfig, ItemsConfig};
use item_service::domain::foundation::{DomainError, ErrorCode, IdentityClaims, RequestId, UserId};
use item_service::domain::user::{Role, User};
use item_service::domain::validation::ValidationResult;

// =============================================================================
// Test Infrastructure
// =============================================================================

const DIRECTORY: &str = r#"
    [items]
    max_items_per_user = 10

    [[directory.users]]
    user_id = "user1"
    role = "USER"
    teams = ["engineering"]

    [[directory.users]]
    user_id = "user2"
    role = "TEAM_ADMIN"
    teams = ["engineering"]

    [[directory.users]]
    user_id = "user3"
    role = "ADMIN"
    teams = []

    [[directory.users]]
    user_id = "user4"
    role = "USER"
    teams = ["marketing"]
"#;

struct Service {
    config: AppConfig,
    repo: Arc<InMemoryItemRepository>,
    resolver: IdentityResolver,
}

impl Service {
    fn new() -> Self {
        let config = AppConfig::from_toml(DIRECTORY).unwrap();
        config.validate().unwrap();
        let directory = InMemoryDirectory::from_config(&config.directory).unwrap();
        Self {
            repo: Arc::new(InMemoryItemRepository::new()),
            resolver: IdentityResolver::new(Arc::new(directory)),
            config,
        }
    }

    fn limits(&self) -> ItemsConfig {
        self.config.items.clone()
    }

    async fn login(&self, user_id: &str) -> User {
        let claims = IdentityClaims::new(
            UserId::new(user_id).unwrap(),
            user_id,
            format!("{}@example.com", user_id),
        );
        self.resolver.resolve(claims).await.unwrap()
    }

    fn create(&self) -> Pipeline<CreateItemService> {
        Pipeline::new(CreateItemService::new(self.repo.clone(), self.limits()))
    }

    fn get(&self) -> Pipeline<GetItemService> {
        Pipeline::new(GetItemService::new(self.repo.clone()))
    }

    fn list(&self) -> Pipeline<ListItemsService> {
        Pipeline::new(ListItemsService::new(self.repo.clone(), self.limits()))
    }

    fn update(&self) -> Pipeline<UpdateItemService> {
        Pipeline::new(UpdateItemService::new(self.repo.clone(), self.limits()))
    }

    fn delete(&self) -> Pipeline<DeleteItemService> {
        Pipeline::new(DeleteItemService::new(self.repo.clone()))
    }

    /// A TEAM item owned by user2, shared with engineering.
    async fn engineering_item(&self) -> String {
        let owner = self.login("user2").await;
        let request = CreateItemRequest::new(owner, "quarterly roadmap")
            .with_access_level("TEAM")
            .with_team("engineering");
        self.create().execute(request).await.unwrap().item.id().to_string()
    }
}

// =============================================================================
// Authorization scenarios through the endpoints
// =============================================================================

#[tokio::test]
async fn team_member_reads_but_cannot_modify_team_item() {
    let svc = Service::new();
    let item_id = svc.engineering_item().await;
    let user1 = svc.login("user1").await;

    let read = svc
        .get()
        .execute(GetItemRequest::new(user1.clone(), &item_id).owned_by("user2"))
        .await;
    let write = svc
        .update()
        .execute(UpdateItemRequest::new(user1, &item_id, "hijacked").owned_by("user2"))
        .await;

    assert!(read.is_ok());
    let err = write.unwrap_err();
    assert_eq!(err.kind(), PipelineErrorKind::Validation);
    assert!(err.is_client_error());
}

#[tokio::test]
async fn team_admin_modifies_team_item_owned_by_someone_else() {
    let svc = Service::new();
    let owner = svc.login("user1").await;
    let created = svc
        .create()
        .execute(
            CreateItemRequest::new(owner, "team notes")
                .with_access_level("TEAM")
                .with_team("engineering"),
        )
        .await
        .unwrap();
    let item_id = created.item.id().to_string();
    let team_admin = svc.login("user2").await;

    let updated = svc
        .update()
        .execute(UpdateItemRequest::new(team_admin, &item_id, "edited by lead").owned_by("user1"))
        .await
        .unwrap();

    assert_eq!(updated.item.message(), "edited by lead");
    assert_eq!(updated.item.user_id().as_str(), "user1");
    assert_eq!(updated.item.created_by().as_str(), "user1");
}

#[tokio::test]
async fn admin_reads_and_modifies_individual_item() {
    let svc = Service::new();
    let owner = svc.login("userX").await;
    let created = svc
        .create()
        .execute(CreateItemRequest::new(owner, "private"))
        .await
        .unwrap();
    let item_id = created.item.id().to_string();
    let admin = svc.login("user3").await;

    assert!(svc
        .get()
        .execute(GetItemRequest::new(admin.clone(), &item_id).owned_by("userX"))
        .await
        .is_ok());
    assert!(svc
        .delete()
        .execute(DeleteItemRequest::new(admin, &item_id).owned_by("userX"))
        .await
        .is_ok());
    assert!(svc.repo.is_empty().await);
}

#[tokio::test]
async fn other_team_member_cannot_read_team_item() {
    let svc = Service::new();
    let item_id = svc.engineering_item().await;
    let user4 = svc.login("user4").await;

    let err = svc
        .get()
        .execute(GetItemRequest::new(user4, &item_id).owned_by("user2"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::Validation);
    assert!(err.message().starts_with("Not authorized to access item"));
}

#[tokio::test]
async fn unknown_identity_is_least_privileged() {
    let svc = Service::new();
    let item_id = svc.engineering_item().await;
    let stranger = svc.login("admin-sounding-name").await;

    assert_eq!(stranger.role(), Role::User);
    assert!(svc
        .get()
        .execute(GetItemRequest::new(stranger, &item_id).owned_by("user2"))
        .await
        .is_err());
}

// =============================================================================
// Pipeline behavior
// =============================================================================

#[tokio::test]
async fn missing_message_and_oversized_limit_are_both_reported() {
    let svc = Service::new();
    let user = svc.login("user1").await;

    let create_input = svc.create().service().validate_input(&CreateItemRequest {
        user: user.clone(),
        message: None,
        access_level: None,
        team_id: None,
    });
    let list_input = svc
        .list()
        .service()
        .validate_input(&ListItemsRequest::new(user).with_limit(101));
    let combined: ValidationResult = create_input.merged(list_input);

    assert!(!combined.is_valid());
    let fields: Vec<_> = combined
        .errors()
        .iter()
        .map(|e| e.field.clone().unwrap_or_default())
        .collect();
    assert_eq!(fields, vec!["message", "limit"]);
}

#[tokio::test]
async fn read_only_endpoints_never_write() {
    let svc = Service::new();
    let item_id = svc.engineering_item().await;
    let writes_before = svc.repo.write_count();
    let user1 = svc.login("user1").await;

    svc.get()
        .execute(GetItemRequest::new(user1.clone(), &item_id).owned_by("user2"))
        .await
        .unwrap();
    let listed = svc.list().execute(ListItemsRequest::new(user1)).await.unwrap();

    assert_eq!(listed.count, 1);
    assert_eq!(svc.repo.write_count(), writes_before);
}

#[tokio::test]
async fn failed_input_validation_touches_no_collaborator() {
    let svc = Service::new();
    let user = svc.login("user1").await;

    let err = svc
        .create()
        .execute(CreateItemRequest::new(user, "   ").with_access_level("galaxy"))
        .await
        .unwrap_err();

    assert_eq!(err.validation_result().unwrap().errors().len(), 2);
    assert_eq!(svc.repo.read_count(), 0);
    assert_eq!(svc.repo.write_count(), 0);
}

#[tokio::test]
async fn every_failure_carries_tracing_context() {
    let svc = Service::new();
    let user = svc.login("user1").await;
    svc.repo
        .fail_with(DomainError::new(ErrorCode::DatabaseError, "connection refused"))
        .await;

    let err = svc
        .list()
        .execute_with_request_id(ListItemsRequest::new(user), RequestId::from_external("trace-42"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), PipelineErrorKind::Decoration);
    assert_eq!(err.context_value(REQUEST_ID_KEY), Some("trace-42"));
    assert_eq!(err.context_value(OPERATION_KEY), Some("list_items"));
    assert_eq!(err.public_message(), "Internal server error");
}

#[tokio::test]
async fn deleted_item_is_gone_for_everyone() {
    let svc = Service::new();
    let item_id = svc.engineering_item().await;
    let owner = svc.login("user2").await;

    svc.delete()
        .execute(DeleteItemRequest::new(owner.clone(), &item_id))
        .await
        .unwrap();
    let err = svc
        .get()
        .execute(GetItemRequest::new(owner, &item_id))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.message().ends_with("not found"));
}

#[tokio::test]
async fn concurrent_executions_do_not_share_context() {
    let svc = Arc::new(Service::new());
    let user = svc.login("user1").await;

    let mut handles = Vec::new();
    for n in 0..8 {
        let svc = svc.clone();
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            svc.create()
                .execute(CreateItemRequest::new(user, format!("note {}", n)))
                .await
                .unwrap()
        }));
    }

    let mut request_ids = std::collections::HashSet::new();
    for handle in handles {
        request_ids.insert(handle.await.unwrap().request_id);
    }

    assert_eq!(request_ids.len(), 8);
    assert_eq!(svc.repo.len().await, 8);
}
