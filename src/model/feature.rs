//! Feature-flag record, validation, and access evaluation.
//!
//! # Purpose
//! Defines the flag entity persisted by the store and the pure decision
//! rules that grant or deny access to a requester: the global toggle,
//! explicit user/group grants, and deterministic percentage bucketing.
//!
//! # Notes
//! Evaluation is side-effect free and total; no method here performs I/O
//! or returns an error. The percentage bucket hashes the ASCII decimal
//! form of the user ID with IEEE CRC-32, so bucket membership is stable
//! across processes and monotonic in the percentage threshold.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

const KEY_MIN_LEN: usize = 3;
const KEY_MAX_LEN: usize = 50;

/// A named feature toggle.
///
/// A disabled flag can still be partially enabled through `users`,
/// `groups`, and `percentage`. Absent JSON fields decode to their zero
/// values, which the update path treats as "unchanged".
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct FeatureFlag {
    /// Unique key, 3-50 characters of `[a-z0-9_]`. Immutable once created.
    #[serde(default)]
    pub key: String,
    /// Unconditional global toggle.
    #[serde(default)]
    pub enabled: bool,
    /// User IDs granted explicit access.
    #[serde(default)]
    pub users: Vec<u32>,
    /// Group names granted explicit access.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Fraction of all users granted access via hashing, 0-100 inclusive.
    #[serde(default)]
    pub percentage: u32,
}

/// Requester descriptor carried by access-check requests.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct AccessRequest {
    /// Requesting user ID, if any.
    #[serde(default)]
    pub user: Option<u32>,
    /// Groups the requester belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("percentage must be between 0 and 100")]
    InvalidPercentage,
    #[error("feature key must be between 3 and 50 characters")]
    InvalidKeyLength,
    #[error("feature key must only contain digits, lowercase letters and underscores")]
    InvalidKeyFormat,
}

impl FeatureFlag {
    /// Check the record is well-formed before it enters the store.
    ///
    /// Fail-fast: the first failing check wins. Percentage is checked
    /// first, then key length, then key format.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.percentage > 100 {
            return Err(ValidationError::InvalidPercentage);
        }
        if self.key.len() < KEY_MIN_LEN || self.key.len() > KEY_MAX_LEN {
            return Err(ValidationError::InvalidKeyLength);
        }
        if !self
            .key
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'))
        {
            return Err(ValidationError::InvalidKeyFormat);
        }
        Ok(())
    }

    /// A flag is fully enabled when the toggle is on or the percentage
    /// reaches 100.
    pub fn is_enabled(&self) -> bool {
        self.enabled || self.percentage == 100
    }

    /// A flag is partially enabled when it is not fully enabled but grants
    /// access through users, groups, or a non-zero percentage.
    pub fn is_partially_enabled(&self) -> bool {
        !self.is_enabled()
            && (!self.users.is_empty() || !self.groups.is_empty() || self.percentage > 0)
    }

    /// Whether members of `group` have access to the feature.
    pub fn group_has_access(&self, group: &str) -> bool {
        self.is_enabled()
            || (self.is_partially_enabled() && self.groups.iter().any(|g| g == group))
    }

    /// Whether `user` has access to the feature, either explicitly or via
    /// the percentage bucket.
    pub fn user_has_access(&self, user: u32) -> bool {
        self.is_enabled()
            || (self.is_partially_enabled()
                && (self.users.contains(&user) || self.user_allowed_by_percentage(user)))
    }

    /// Deterministic percentage bucketing: IEEE CRC-32 over the ASCII
    /// decimal form of the user ID (`10` hashes the bytes of `"10"`),
    /// modulo 100, strictly below the threshold. Raising the percentage
    /// only ever adds users to the bucket.
    pub fn user_allowed_by_percentage(&self, user: u32) -> bool {
        crc32fast::hash(user.to_string().as_bytes()) % 100 < self.percentage
    }

    /// Combined access check for a requester descriptor: fully enabled
    /// grants immediately, then any supplied group, then the user ID if
    /// one is present.
    pub fn grants_access(&self, request: &AccessRequest) -> bool {
        if self.is_enabled() {
            return true;
        }
        if request.groups.iter().any(|group| self.group_has_access(group)) {
            return true;
        }
        if let Some(user) = request.user {
            return self.user_has_access(user);
        }
        false
    }
}
