//! In-memory directory adapter.
//!
//! Implements the `DirectoryLookup` port from a map of user ids to
//! directory entries, seeded from `DirectoryConfig` or built up in tests.
//!
//! # Example
//!
//! ```ignore
//! use item_service::adapters::InMemoryDirectory;
//! use item_service::domain::user::Role;
//!
//! let directory = InMemoryDirectory::new()
//!     .with_user("alice", Role::TeamAdmin, &["engineering"]);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::config::DirectoryConfig;
use crate::domain::foundation::{DomainError, ErrorCode, FieldError, TeamId, UserId};
use crate::domain::user::Role;
use crate::ports::{DirectoryEntry, DirectoryLookup};

/// Directory backed by an in-process map.
///
/// Builders own the directory and write through a poisoned lock. Shared
/// calls (`insert`, `lookup`) report it as `DirectoryUnavailable`.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<UserId, DirectoryEntry>>,
    /// Optional error to return for all lookups (for error testing)
    force_error: RwLock<Option<DomainError>>,
}

impl InMemoryDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from configuration.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, FieldError> {
        let mut entries = HashMap::new();
        for user in &config.users {
            let teams = user
                .teams
                .iter()
                .map(TeamId::new)
                .collect::<Result<Vec<_>, _>>()?;
            entries.insert(UserId::new(&user.user_id)?, DirectoryEntry::new(user.role, teams));
        }
        Ok(Self {
            entries: RwLock::new(entries),
            force_error: RwLock::new(None),
        })
    }

    /// Adds a user with a role and team list.
    ///
    /// Panics on empty ids; intended for fixtures.
    pub fn with_user(mut self, user_id: &str, role: Role, teams: &[&str]) -> Self {
        let entry = DirectoryEntry::new(
            role,
            teams.iter().map(|t| TeamId::new(*t).expect("team id")),
        );
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(UserId::new(user_id).expect("user id"), entry);
        self
    }

    /// Registers or replaces an entry at runtime.
    pub fn insert(&self, user_id: UserId, entry: DirectoryEntry) -> Result<(), DomainError> {
        self.entries.write().map_err(poisoned)?.insert(user_id, entry);
        Ok(())
    }

    /// Forces all lookups to return the specified error.
    pub fn with_error(mut self, error: DomainError) -> Self {
        *self
            .force_error
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::new(ErrorCode::DirectoryUnavailable, "Directory lock poisoned")
}

#[async_trait]
impl DirectoryLookup for InMemoryDirectory {
    async fn lookup(&self, user_id: &UserId) -> Result<Option<DirectoryEntry>, DomainError> {
        if let Some(error) = self.force_error.read().map_err(poisoned)?.clone() {
            return Err(error);
        }

        Ok(self.entries.read().map_err(poisoned)?.get(user_id).cloned())
    }
}
