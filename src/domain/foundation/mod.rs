//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the item service domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, IdentityClaims};
pub use errors::{DomainError, ErrorCode, FieldError};
pub use ids::{ItemId, RequestId, TeamId, UserId};
pub use timestamp::Timestamp;
