//! In-Memory Item Repository Adapter
//!
//! Stores items in memory keyed by `(owner, id)`.
//! Useful for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ItemId, TeamId, UserId};
use crate::domain::item::Item;
use crate::ports::{ItemQuery, ItemRepository, SortOrder};

type ItemKey = (UserId, ItemId);

/// In-memory storage for items
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<ItemKey, Item>>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_with: Arc<RwLock<Option<DomainError>>>,
}

impl InMemoryItemRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository without counting as a write.
    pub async fn seed(&self, item: Item) {
        self.items
            .write()
            .await
            .insert((item.user_id().clone(), item.id()), item);
    }

    /// Makes every subsequent call fail with `error` (for error-path tests).
    pub async fn fail_with(&self, error: DomainError) {
        *self.fail_with.write().await = Some(error);
    }

    /// Returns to normal operation.
    pub async fn clear_failure(&self) {
        *self.fail_with.write().await = None;
    }

    /// Number of read calls served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of put/update/delete calls received.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn check_failure(&self) -> Result<(), DomainError> {
        match self.fail_with.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found(owner: &UserId, id: &ItemId) -> DomainError {
    DomainError::new(ErrorCode::ItemNotFound, "Item not found")
        .with_detail("owner_id", owner.to_string())
        .with_detail("item_id", id.to_string())
}

fn apply_query(mut items: Vec<Item>, query: ItemQuery) -> Vec<Item> {
    items.sort_by_key(|item| (item.created_at(), item.id()));
    if query.order == SortOrder::Desc {
        items.reverse();
    }
    items.truncate(query.limit as usize);
    items
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn get(&self, owner: &UserId, id: &ItemId) -> Result<Option<Item>, DomainError> {
        self.record_read();
        self.check_failure().await?;
        let items = self.items.read().await;
        Ok(items.get(&(owner.clone(), *id)).cloned())
    }

    async fn put(&self, item: &Item) -> Result<(), DomainError> {
        self.record_write();
        self.check_failure().await?;
        let mut items = self.items.write().await;
        let key = (item.user_id().clone(), item.id());
        if items.contains_key(&key) {
            return Err(DomainError::new(ErrorCode::Conflict, "Item already exists")
                .with_detail("item_id", item.id().to_string()));
        }
        items.insert(key, item.clone());
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), DomainError> {
        self.record_write();
        self.check_failure().await?;
        let mut items = self.items.write().await;
        match items.get_mut(&(item.user_id().clone(), item.id())) {
            Some(stored) => {
                *stored = item.clone();
                Ok(())
            }
            None => Err(not_found(item.user_id(), &item.id())),
        }
    }

    async fn delete(&self, owner: &UserId, id: &ItemId) -> Result<(), DomainError> {
        self.record_write();
        self.check_failure().await?;
        let mut items = self.items.write().await;
        items
            .remove(&(owner.clone(), *id))
            .map(|_| ())
            .ok_or_else(|| not_found(owner, id))
    }

    async fn query_by_owner(
        &self,
        owner: &UserId,
        query: ItemQuery,
    ) -> Result<Vec<Item>, DomainError> {
        self.record_read();
        self.check_failure().await?;
        let items = self.items.read().await;
        let owned = items
            .values()
            .filter(|item| item.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(apply_query(owned, query))
    }

    async fn query_by_team(
        &self,
        team: &TeamId,
        query: ItemQuery,
    ) -> Result<Vec<Item>, DomainError> {
        self.record_read();
        self.check_failure().await?;
        let items = self.items.read().await;
        let shared = items
            .values()
            .filter(|item| item.is_shared_with(team))
            .cloned()
            .collect();
        Ok(apply_query(shared, query))
    }

    async fn count_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        self.record_read();
        self.check_failure().await?;
        let items = self.items.read().await;
        Ok(items.values().filter(|item| item.is_owned_by(owner)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemDraft;

    fn owner(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn item(owner_id: &str, message: &str) -> Item {
        ItemDraft::new(owner(owner_id), message).build().unwrap()
    }

    #[tokio::test]
    async fn put_then_get_returns_item() {
        let repo = InMemoryItemRepository::new();
        let stored = item("alice", "hello");

        repo.put(&stored).await.unwrap();
        let found = repo.get(&owner("alice"), &stored.id()).await.unwrap();

        assert_eq!(found, Some(stored));
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn get_with_wrong_owner_finds_nothing() {
        let repo = InMemoryItemRepository::new();
        let stored = item("alice", "hello");
        repo.seed(stored.clone()).await;

        let found = repo.get(&owner("bob"), &stored.id()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn put_duplicate_is_conflict() {
        let repo = InMemoryItemRepository::new();
        let stored = item("alice", "hello");
        repo.put(&stored).await.unwrap();

        let err = repo.put(&stored).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let repo = InMemoryItemRepository::new();
        let err = repo.update(&item("alice", "hello")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[tokio::test]
    async fn delete_removes_item() {
        let repo = InMemoryItemRepository::new();
        let stored = item("alice", "hello");
        repo.seed(stored.clone()).await;

        repo.delete(&owner("alice"), &stored.id()).await.unwrap();

        assert!(repo.is_empty().await);
        let err = repo.delete(&owner("alice"), &stored.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[tokio::test]
    async fn query_by_owner_orders_and_limits() {
        let repo = InMemoryItemRepository::new();
        for message in ["one", "two", "three"] {
            repo.seed(item("alice", message)).await;
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        repo.seed(item("bob", "other")).await;

        let newest = repo
            .query_by_owner(&owner("alice"), ItemQuery::new(2, SortOrder::Desc))
            .await
            .unwrap();
        let oldest = repo
            .query_by_owner(&owner("alice"), ItemQuery::new(10, SortOrder::Asc))
            .await
            .unwrap();

        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].message(), "three");
        assert_eq!(oldest.len(), 3);
        assert_eq!(oldest[0].message(), "one");
    }

    #[tokio::test]
    async fn query_by_team_only_returns_team_items() {
        let repo = InMemoryItemRepository::new();
        let engineering = TeamId::new("engineering").unwrap();
        repo.seed(
            ItemDraft::new(owner("alice"), "shared")
                .shared_with(engineering.clone())
                .build()
                .unwrap(),
        )
        .await;
        repo.seed(item("alice", "private")).await;

        let shared = repo
            .query_by_team(&engineering, ItemQuery::new(10, SortOrder::Desc))
            .await
            .unwrap();

        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].message(), "shared");
    }

    #[tokio::test]
    async fn count_by_owner_counts_only_owned() {
        let repo = InMemoryItemRepository::new();
        repo.seed(item("alice", "a")).await;
        repo.seed(item("alice", "b")).await;
        repo.seed(item("bob", "c")).await;

        assert_eq!(repo.count_by_owner(&owner("alice")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn forced_failure_is_returned() {
        let repo = InMemoryItemRepository::new();
        repo.fail_with(DomainError::new(ErrorCode::DatabaseError, "throttled"))
            .await;

        let err = repo.get(&owner("alice"), &ItemId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        repo.clear_failure().await;
        assert!(repo.get(&owner("alice"), &ItemId::new()).await.is_ok());
    }
}
