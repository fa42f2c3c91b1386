//! Directory port: role and team membership for an identity.
//!
//! Token verification tells us *who* a caller is; the directory tells us
//! *what* they may do. Keeping the mapping behind this port means the
//! authorization engine never hardcodes who is an admin.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::foundation::{DomainError, TeamId, UserId};
use crate::domain::user::Role;

/// Role and teams recorded for one user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryEntry {
    pub role: Role,
    pub team_ids: BTreeSet<TeamId>,
}

impl DirectoryEntry {
    pub fn new(role: Role, team_ids: impl IntoIterator<Item = TeamId>) -> Self {
        Self {
            role,
            team_ids: team_ids.into_iter().collect(),
        }
    }
}

/// Looks up directory entries for authenticated identities.
///
/// # Contract
///
/// - `Ok(None)` when the directory has no record for the user
/// - `Err` with `ErrorCode::DirectoryUnavailable` for transient failures
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    async fn lookup(&self, user_id: &UserId) -> Result<Option<DirectoryEntry>, DomainError>;
}
