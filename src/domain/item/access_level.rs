//! Item visibility classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::FieldError;

/// Who, besides the owner, can see an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    /// Owner only.
    #[default]
    Individual,

    /// Members of the item's team.
    Team,

    /// Everyone.
    Public,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Individual => "INDIVIDUAL",
            AccessLevel::Team => "TEAM",
            AccessLevel::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIVIDUAL" => Ok(AccessLevel::Individual),
            "TEAM" => Ok(AccessLevel::Team),
            "PUBLIC" => Ok(AccessLevel::Public),
            _ => Err(FieldError::invalid_format(
                "access_level",
                "must be one of INDIVIDUAL, TEAM, PUBLIC",
            )),
        }
    }
}
