//! Access decisions over (user, item) pairs.
//!
//! Every decision is pure and total. Reads and writes each have one
//! precedence-ordered rule list, evaluated first match wins:
//!
//! ```text
//! read:   admin -> owner -> team member (TEAM item) -> public -> denied
//! modify: admin -> owner -> team admin (TEAM item)  -> denied
//! ```
//!
//! `can_access`/`can_modify` are derived from the same rule list as
//! `access_reason`, so the boolean answer and the audit tag cannot drift.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::TeamId;
use crate::domain::item::{AccessLevel, Item};
use crate::domain::user::User;

/// The kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    Read,
    Modify,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Read => "read",
            AccessAction::Modify => "modify",
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical tag explaining an access decision, for audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    AdminAccess,
    OwnerAccess,
    TeamMemberAccess,
    PublicAccess,
    AccessDenied,
    AdminModify,
    OwnerModify,
    TeamAdminModify,
    ModifyDenied,
}

impl AccessReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessReason::AdminAccess => "admin_access",
            AccessReason::OwnerAccess => "owner_access",
            AccessReason::TeamMemberAccess => "team_member_access",
            AccessReason::PublicAccess => "public_access",
            AccessReason::AccessDenied => "access_denied",
            AccessReason::AdminModify => "admin_modify",
            AccessReason::OwnerModify => "owner_modify",
            AccessReason::TeamAdminModify => "team_admin_modify",
            AccessReason::ModifyDenied => "modify_denied",
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessReason::AccessDenied | AccessReason::ModifyDenied)
    }

    pub fn is_granted(&self) -> bool {
        !self.is_denied()
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn read_reason(user: &User, item: &Item) -> AccessReason {
    if user.is_admin() {
        AccessReason::AdminAccess
    } else if item.is_owned_by(user.user_id()) {
        AccessReason::OwnerAccess
    } else if shares_team(user, item) {
        AccessReason::TeamMemberAccess
    } else if item.access_level() == AccessLevel::Public {
        AccessReason::PublicAccess
    } else {
        AccessReason::AccessDenied
    }
}

fn modify_reason(user: &User, item: &Item) -> AccessReason {
    if user.is_admin() {
        AccessReason::AdminModify
    } else if item.is_owned_by(user.user_id()) {
        AccessReason::OwnerModify
    } else if user.can_manage_team_items() && shares_team(user, item) {
        AccessReason::TeamAdminModify
    } else {
        AccessReason::ModifyDenied
    }
}

fn shares_team(user: &User, item: &Item) -> bool {
    item.access_level() == AccessLevel::Team
        && item.team_id().is_some_and(|team| user.is_member_of(team))
}

/// Audit tag for the decision `user` gets on `item` for `action`.
pub fn access_reason(user: &User, item: &Item, action: AccessAction) -> AccessReason {
    match action {
        AccessAction::Read => read_reason(user, item),
        AccessAction::Modify => modify_reason(user, item),
    }
}

/// Read permission.
pub fn can_access(user: &User, item: &Item) -> bool {
    read_reason(user, item).is_granted()
}

/// Write/delete permission. Public items are writable only by owner and admins.
pub fn can_modify(user: &User, item: &Item) -> bool {
    modify_reason(user, item).is_granted()
}

/// True if `user` may place items in `team_id`.
pub fn can_access_team(user: &User, team_id: &TeamId) -> bool {
    user.is_admin() || user.is_member_of(team_id)
}

/// True if an item owned by `user` may carry `team_id`.
///
/// No team (an individual or public item) is always valid.
pub fn is_valid_team_assignment(user: &User, team_id: Option<&TeamId>) -> bool {
    team_id.map_or(true, |team| can_access_team(user, team))
}
