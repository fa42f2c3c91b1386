//! Item endpoints built on the service pipeline.
//!
//! Each endpoint is a [`ServicePipeline`](crate::application::pipeline::ServicePipeline)
//! over a typed request, context and response. Requests carry raw transport
//! values plus the resolved caller; phase 1 turns them into domain types.

mod create_item;
mod delete_item;
mod get_item;
mod list_items;
mod update_item;

pub use create_item::{CreateItemContext, CreateItemRequest, CreateItemService};
pub use delete_item::{DeleteItemContext, DeleteItemRequest, DeleteItemResponse, DeleteItemService};
pub use get_item::{GetItemContext, GetItemRequest, GetItemService};
pub use list_items::{ListItemsContext, ListItemsRequest, ListItemsResponse, ListItemsService};
pub use update_item::{UpdateItemContext, UpdateItemRequest, UpdateItemService};

use serde::Serialize;
use std::sync::Arc;

use crate::application::pipeline::{PipelineContext, PipelineError};
use crate::domain::authorization::{AccessAction, AccessDecision};
use crate::domain::foundation::{FieldError, ItemId, UserId};
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::domain::validation::ValidationResult;
use crate::ports::ItemRepository;

/// Response carrying one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub request_id: String,
    pub item: Item,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ItemResponse {
    fn new(pipeline: &PipelineContext, item: Item) -> Self {
        Self {
            request_id: pipeline.request_id().to_string(),
            item,
            warnings: pipeline.warnings(),
        }
    }
}

/// Owner/id pair identifying a stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemKey {
    owner: UserId,
    id: ItemId,
}

impl ItemKey {
    /// Key from raw values that already passed [`check_item_key`].
    fn parse(caller: &User, owner_id: Option<&str>, item_id: Option<&str>) -> Option<Self> {
        let owner = match owner_id {
            Some(raw) => UserId::new(raw).ok()?,
            None => caller.user_id().clone(),
        };
        let id = item_id?.trim().parse().ok()?;
        Some(Self { owner, id })
    }

    /// The key, or an unexpected failure if phase 1 let a bad key through.
    fn require(key: Option<&ItemKey>) -> Result<&ItemKey, PipelineError> {
        key.ok_or_else(|| PipelineError::unexpected("item key missing after input validation"))
    }
}

/// `item_id` is required and must be a UUID; `owner_id`, if given, non-blank.
fn check_item_key(result: &mut ValidationResult, owner_id: Option<&str>, item_id: Option<&str>) {
    match item_id.map(str::trim) {
        None | Some("") => result.add_field_error(&FieldError::empty_field("item_id")),
        Some(raw) => {
            if raw.parse::<ItemId>().is_err() {
                result.add_field_error(&FieldError::invalid_format("item_id", "must be a UUID"));
            }
        }
    }
    if owner_id.is_some_and(|raw| raw.trim().is_empty()) {
        result.add_field_error(&FieldError::empty_field("owner_id"));
    }
}

/// `message` is required, non-blank, and at most `max_len` characters.
fn check_message(result: &mut ValidationResult, message: Option<&str>, max_len: usize) {
    match message {
        None => result.add_error(Some("message"), "Message is required"),
        Some(text) if text.trim().is_empty() => {
            result.add_error(Some("message"), "Message cannot be blank")
        }
        Some(text) => {
            let len = text.chars().count();
            if len > max_len {
                result.add_field_error(&FieldError::out_of_range(
                    "message",
                    1,
                    max_len as i64,
                    len as i64,
                ));
            }
        }
    }
}

/// Loads the item behind `key` for the decoration phase.
async fn load_item(
    repository: &Arc<dyn ItemRepository>,
    key: &ItemKey,
) -> Result<Option<Item>, PipelineError> {
    repository.get(&key.owner, &key.id).await.map_err(|err| {
        PipelineError::decoration_failed("Failed to load item", err)
            .with_context("itemId", key.id.to_string())
    })
}

/// Business checks shared by single-item endpoints.
///
/// A missing item short-circuits: nothing else is checked. Otherwise the
/// access decision is audited and a denial becomes a validation error.
fn check_item_access(
    pipeline: &PipelineContext,
    user: &User,
    key: Option<&ItemKey>,
    item: Option<&Item>,
    action: AccessAction,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let Some(item) = item else {
        let target = key.map(|k| k.id.to_string()).unwrap_or_default();
        result.add_error(Some("item_id"), format!("Item {} not found", target));
        return result;
    };

    let decision = AccessDecision::evaluate(user, item, action);
    decision.audit(pipeline.request_id().as_str());
    if let Err(forbidden) = decision.into_result() {
        result.add_error(None, forbidden.message);
    }
    result
}
