//! ListItems - the caller's own items plus those shared with their teams.
//!
//! Decoration gathers candidates by owner and by team, so with a correct
//! repository every candidate is readable. The response phase still runs
//! each one through `can_access` and audits the decision; anything a
//! repository returns outside that scope is dropped there.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::application::pipeline::{PipelineContext, PipelineError, PipelineScoped, ServicePipeline};
use crate::config::ItemsConfig;
use crate::domain::authorization::{AccessAction, AccessDecision};
use crate::domain::foundation::FieldError;
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::{ItemQuery, ItemRepository, SortOrder};

#[derive(Debug, Clone)]
pub struct ListItemsRequest {
    pub user: User,
    /// Page size; `items.default_list_limit` when absent.
    pub limit: Option<i64>,
    /// `asc` or `desc` on creation time, any case. Defaults to `desc`.
    pub sort_order: Option<String>,
}

impl ListItemsRequest {
    pub fn new(user: User) -> Self {
        Self {
            user,
            limit: None,
            sort_order: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }
}

#[derive(Debug)]
pub struct ListItemsContext {
    pipeline: PipelineContext,
    user: User,
    query: ItemQuery,
    candidates: Vec<Item>,
}

impl PipelineScoped for ListItemsContext {
    fn pipeline(&self) -> &PipelineContext {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut PipelineContext {
        &mut self.pipeline
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItemsResponse {
    pub request_id: String,
    pub items: Vec<Item>,
    pub count: usize,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub struct ListItemsService {
    repository: Arc<dyn ItemRepository>,
    limits: ItemsConfig,
}

impl ListItemsService {
    pub fn new(repository: Arc<dyn ItemRepository>, limits: ItemsConfig) -> Self {
        Self { repository, limits }
    }
}

#[async_trait]
impl ServicePipeline for ListItemsService {
    type Request = ListItemsRequest;
    type Context = ListItemsContext;
    type Response = ListItemsResponse;

    fn operation(&self) -> &'static str {
        "list_items"
    }

    fn validate_input(&self, request: &ListItemsRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let max = i64::from(self.limits.max_list_limit);
        if let Some(limit) = request.limit {
            if !(1..=max).contains(&limit) {
                result.add_field_error(&FieldError::out_of_range("limit", 1, max, limit));
            }
        }
        if let Some(Err(err)) = request.sort_order.as_deref().map(str::parse::<SortOrder>) {
            result.add_field_error(&err);
        }
        result
    }

    fn create_context(
        &self,
        request: ListItemsRequest,
        pipeline: PipelineContext,
    ) -> ListItemsContext {
        let limit = request
            .limit
            .and_then(|limit| u32::try_from(limit).ok())
            .unwrap_or(self.limits.default_list_limit);
        let order = request
            .sort_order
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        ListItemsContext {
            pipeline,
            user: request.user,
            query: ItemQuery::new(limit, order),
            candidates: Vec::new(),
        }
    }

    async fn decorate(&self, context: &mut ListItemsContext) -> Result<(), PipelineError> {
        let owner = context.user.user_id();
        let mut found: HashMap<_, Item> = HashMap::new();

        let owned = self
            .repository
            .query_by_owner(owner, context.query)
            .await
            .map_err(|err| PipelineError::decoration_failed("Failed to list owned items", err))?;
        for item in owned {
            found.insert((item.user_id().clone(), item.id()), item);
        }

        for team in context.user.team_ids() {
            let shared = self
                .repository
                .query_by_team(team, context.query)
                .await
                .map_err(|err| {
                    PipelineError::decoration_failed("Failed to list team items", err)
                        .with_context("teamId", team.as_str())
                })?;
            for item in shared {
                found.insert((item.user_id().clone(), item.id()), item);
            }
        }

        context.pipeline.insert_metadata("candidateCount", found.len());
        context.candidates = found.into_values().collect();
        Ok(())
    }

    fn build_response(
        &self,
        context: ListItemsContext,
    ) -> Result<ListItemsResponse, PipelineError> {
        let request_id = context.request_id().to_string();
        let mut items: Vec<Item> = context
            .candidates
            .into_iter()
            .filter(|item| {
                let decision = AccessDecision::evaluate(&context.user, item, AccessAction::Read);
                decision.audit(&request_id);
                decision.is_granted()
            })
            .collect();

        items.sort_by_key(|item| (item.created_at(), item.id()));
        if context.query.order == SortOrder::Desc {
            items.reverse();
        }
        items.truncate(context.query.limit as usize);

        tracing::debug!(count = items.len(), "items listed");
        Ok(ListItemsResponse {
            request_id,
            count: items.len(),
            items,
            sort_order: context.query.order,
            warnings: context.pipeline.warnings(),
        })
    }
}
