//! IdentityResolver - turns verified claims into an authorization `User`.

use std::sync::Arc;

use crate::domain::foundation::{AuthError, IdentityClaims};
use crate::domain::user::{Role, User};
use crate::ports::DirectoryLookup;

/// Resolves role and team memberships for verified identities.
pub struct IdentityResolver {
    directory: Arc<dyn DirectoryLookup>,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn DirectoryLookup>) -> Self {
        Self { directory }
    }

    /// Builds the `User` for `claims`.
    ///
    /// Identities the directory does not know get `Role::User` and no teams.
    pub async fn resolve(&self, claims: IdentityClaims) -> Result<User, AuthError> {
        let entry = self
            .directory
            .lookup(&claims.user_id)
            .await
            .map_err(|err| {
                tracing::warn!(user_id = %claims.user_id, error = %err, "directory lookup failed");
                AuthError::service_unavailable(err.message())
            })?;

        match entry {
            Some(entry) => {
                tracing::debug!(
                    user_id = %claims.user_id,
                    role = entry.role.as_str(),
                    teams = entry.team_ids.len(),
                    "identity resolved"
                );
                Ok(User::from_claims(claims, entry.role, entry.team_ids))
            }
            None => {
                tracing::debug!(
                    user_id = %claims.user_id,
                    "identity not in directory, using least privilege"
                );
                Ok(User::from_claims(claims, Role::User, Vec::new()))
            }
        }
    }
}
