//! Authentication types for the domain layer.
//!
//! `IdentityClaims` represent a caller whose token has already been verified
//! by the authentication collaborator. They carry identity only; role and
//! team membership come from the directory (see `DirectoryLookup`).

use super::UserId;
use thiserror::Error;

/// Verified identity claims extracted from an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// The unique user identifier from the auth provider.
    pub user_id: UserId,

    /// Login name from the token claims.
    pub username: String,

    /// User's email address from the token claims.
    pub email: String,
}

impl IdentityClaims {
    /// Creates a new set of identity claims.
    pub fn new(user_id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Authentication errors surfaced while turning claims into a `User`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The directory or auth service is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
