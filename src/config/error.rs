//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),

    #[error("Maximum message length must be greater than zero")]
    InvalidMessageLength,

    #[error("List limits must be non-zero and default must not exceed maximum")]
    InvalidListLimits,

    #[error("Per-user item quota must be greater than zero")]
    InvalidItemQuota,

    #[error("Quota warning ratio must be in (0, 1]")]
    InvalidQuotaWarningRatio,

    #[error("Directory entry has an invalid team id for user {0}")]
    InvalidDirectoryTeam(String),

    #[error("Directory lists user {0} more than once")]
    DuplicateDirectoryUser(String),
}
