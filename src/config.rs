//! Handler configuration.
//!
//! Quota behavior is feature-flagged by the host; the flag and limits are
//! passed in here at construction and never read from global state.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default per-origin byte limit (sum of key and value lengths).
pub const DEFAULT_MAX_BYTES: i64 = 4096;

/// Default per-origin entry limit.
pub const DEFAULT_MAX_KEYS: i64 = 500;

// ============================================================================
// QuotaConfig
// ============================================================================

/// Per-origin storage quota.
///
/// A non-positive limit disables that limit. With `enabled == false` every
/// quota check passes regardless of the limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuotaConfig {
    /// Whether quota checks run at all (default: true)
    pub enabled: bool,
    /// Maximum total bytes per origin (default: 4096)
    pub max_bytes: i64,
    /// Maximum number of keys per origin (default: 500)
    pub max_keys: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: DEFAULT_MAX_BYTES,
            max_keys: DEFAULT_MAX_KEYS,
        }
    }
}

impl QuotaConfig {
    /// Quota with checks switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Effective byte limit, `None` when disabled.
    pub fn byte_limit(&self) -> Option<usize> {
        positive_limit(self.enabled, self.max_bytes)
    }

    /// Effective key limit, `None` when disabled.
    pub fn key_limit(&self) -> Option<usize> {
        positive_limit(self.enabled, self.max_keys)
    }
}

fn positive_limit(enabled: bool, limit: i64) -> Option<usize> {
    if enabled && limit > 0 {
        usize::try_from(limit).ok()
    } else {
        None
    }
}

// ============================================================================
// HandlerConfig
// ============================================================================

/// Configuration for `PostMessageApi`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerConfig {
    pub quota: QuotaConfig,
}

impl HandlerConfig {
    /// Shorthand mirroring the host's storage-limit feature flag.
    pub fn with_storage_limit_flag(check_storage_limit: bool) -> Self {
        Self {
            quota: QuotaConfig {
                enabled: check_storage_limit,
                ..QuotaConfig::default()
            },
        }
    }

    /// Parse a configuration object. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}
