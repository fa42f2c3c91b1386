//! Auditable access decisions.
//!
//! `AccessDecision` captures the "who, what, why" of one check so endpoints
//! can log it consistently and turn a denial into a Forbidden domain error.

use super::engine::{access_reason, AccessAction, AccessReason};
use crate::domain::foundation::{DomainError, ErrorCode, ItemId, UserId};
use crate::domain::item::Item;
use crate::domain::user::User;

/// Result of an access check, with context for logging/auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub action: AccessAction,
    pub reason: AccessReason,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub owner_id: UserId,
}

impl AccessDecision {
    /// Evaluates `action` for `user` on `item`.
    pub fn evaluate(user: &User, item: &Item, action: AccessAction) -> Self {
        Self {
            action,
            reason: access_reason(user, item, action),
            user_id: user.user_id().clone(),
            item_id: item.id(),
            owner_id: item.user_id().clone(),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.reason.is_granted()
    }

    pub fn is_denied(&self) -> bool {
        self.reason.is_denied()
    }

    /// Human-readable denial text, `None` when granted.
    pub fn denial_message(&self) -> Option<String> {
        if self.is_granted() {
            return None;
        }
        Some(match self.action {
            AccessAction::Read => format!("Not authorized to access item {}", self.item_id),
            AccessAction::Modify => format!("Not authorized to modify item {}", self.item_id),
        })
    }

    /// Emits the decision to the audit log.
    pub fn audit(&self, request_id: &str) {
        tracing::debug!(
            request_id,
            action = self.action.as_str(),
            reason = self.reason.as_str(),
            user_id = %self.user_id,
            item_id = %self.item_id,
            owner_id = %self.owner_id,
            "access decision"
        );
    }

    /// Returns `Ok(())` if granted, `Err(Forbidden)` if denied.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self.denial_message() {
            None => Ok(()),
            Some(message) => Err(DomainError::new(ErrorCode::Forbidden, message)
                .with_detail("action", self.action.as_str())
                .with_detail("reason", self.reason.as_str())
                .with_detail("item_id", self.item_id.to_string())
                .with_detail("user_id", self.user_id.to_string())),
        }
    }
}
