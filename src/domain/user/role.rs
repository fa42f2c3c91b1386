//! Caller roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::FieldError;

/// Permission ceiling of a user. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Reads own, team and public items; writes own items only.
    #[default]
    User,

    /// Additionally writes items shared with the teams they belong to.
    TeamAdmin,

    /// Reads and writes everything.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::TeamAdmin => "TEAM_ADMIN",
            Role::Admin => "ADMIN",
        }
    }

    /// True for roles allowed to modify team items they do not own.
    pub fn can_manage_team_items(&self) -> bool {
        matches!(self, Role::TeamAdmin | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "TEAM_ADMIN" => Ok(Role::TeamAdmin),
            "ADMIN" => Ok(Role::Admin),
            other => Err(FieldError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}
