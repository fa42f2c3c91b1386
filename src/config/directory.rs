//! Directory seed configuration

use serde::Deserialize;
use std::collections::HashSet;

use super::error::ValidationError;
use crate::domain::user::Role;

/// Users known to the configuration-backed directory
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub users: Vec<DirectoryUserConfig>,
}

/// One directory record
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUserConfig {
    pub user_id: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub teams: Vec<String>,
}

impl DirectoryConfig {
    /// Validate directory records
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.user_id.trim().is_empty() {
                return Err(ValidationError::MissingRequired("DIRECTORY__USERS__USER_ID"));
            }
            if user.teams.iter().any(|team| team.trim().is_empty()) {
                return Err(ValidationError::InvalidDirectoryTeam(user.user_id.clone()));
            }
            if !seen.insert(user.user_id.as_str()) {
                return Err(ValidationError::DuplicateDirectoryUser(user.user_id.clone()));
            }
        }
        Ok(())
    }
}
