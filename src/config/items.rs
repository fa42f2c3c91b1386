//! Item endpoint limits

use serde::Deserialize;

use super::error::ValidationError;

/// Limits applied by the item endpoints' validation phases
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsConfig {
    /// Longest accepted message, in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Page size when a list request names none
    #[serde(default = "default_list_limit")]
    pub default_list_limit: u32,

    /// Largest page size a list request may ask for
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: u32,

    /// Items a single user may own
    #[serde(default = "default_max_items_per_user")]
    pub max_items_per_user: u64,

    /// Fraction of the quota after which creates carry a warning
    #[serde(default = "default_quota_warning_ratio")]
    pub quota_warning_ratio: f64,
}

impl ItemsConfig {
    /// Item count at which a quota warning is attached.
    pub fn quota_warning_threshold(&self) -> u64 {
        (self.max_items_per_user as f64 * self.quota_warning_ratio).ceil() as u64
    }

    /// Validate item limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_message_length == 0 {
            return Err(ValidationError::InvalidMessageLength);
        }
        if self.default_list_limit == 0
            || self.max_list_limit == 0
            || self.default_list_limit > self.max_list_limit
        {
            return Err(ValidationError::InvalidListLimits);
        }
        if self.max_items_per_user == 0 {
            return Err(ValidationError::InvalidItemQuota);
        }
        if !(self.quota_warning_ratio > 0.0 && self.quota_warning_ratio <= 1.0) {
            return Err(ValidationError::InvalidQuotaWarningRatio);
        }
        Ok(())
    }
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
            max_items_per_user: default_max_items_per_user(),
            quota_warning_ratio: default_quota_warning_ratio(),
        }
    }
}

fn default_max_message_length() -> usize {
    1000
}

fn default_list_limit() -> u32 {
    20
}

fn default_max_list_limit() -> u32 {
    100
}

fn default_max_items_per_user() -> u64 {
    1000
}

fn default_quota_warning_ratio() -> f64 {
    0.9
}
