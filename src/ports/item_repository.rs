//! Storage port for items.
//!
//! Items are keyed by `(owner, id)`. The pipeline reads through this port
//! only while decorating and writes only while persisting.
//!
//! # Error contract
//!
//! - Missing record on `update`/`delete`: `ErrorCode::ItemNotFound`
//! - Duplicate key on `put`: `ErrorCode::Conflict`
//! - Anything infrastructural: `ErrorCode::DatabaseError`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, FieldError, ItemId, TeamId, UserId};
use crate::domain::item::Item;

/// Ordering on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(FieldError::invalid_format("sort_order", "must be 'asc' or 'desc'")),
        }
    }
}

/// Paging and ordering for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemQuery {
    pub limit: u32,
    pub order: SortOrder,
}

impl ItemQuery {
    pub fn new(limit: u32, order: SortOrder) -> Self {
        Self { limit, order }
    }
}

/// Repository port for item persistence.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Find an item by owner and id.
    async fn get(&self, owner: &UserId, id: &ItemId) -> Result<Option<Item>, DomainError>;

    /// Insert a new item.
    async fn put(&self, item: &Item) -> Result<(), DomainError>;

    /// Replace an existing item.
    async fn update(&self, item: &Item) -> Result<(), DomainError>;

    /// Remove an item.
    async fn delete(&self, owner: &UserId, id: &ItemId) -> Result<(), DomainError>;

    /// Items owned by `owner`, ordered by `created_at`.
    async fn query_by_owner(
        &self,
        owner: &UserId,
        query: ItemQuery,
    ) -> Result<Vec<Item>, DomainError>;

    /// Team items shared with `team`, ordered by `created_at`.
    async fn query_by_team(
        &self,
        team: &TeamId,
        query: ItemQuery,
    ) -> Result<Vec<Item>, DomainError>;

    /// Number of items owned by `owner`.
    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError>;
}
