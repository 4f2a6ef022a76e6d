//! Typed configuration models shared between the service and the API.
//!
//! # Design
//! - Pure data carriers; persistence lives in `modelgate-data`, policy in
//!   `service.rs`.
//! - Serialization shapes here are the wire shapes: the API returns these
//!   types directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// A persisted configuration version.
///
/// Immutable after creation except for `is_active`, which is only toggled by
/// the publish operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigVersion {
    /// Storage identity, unique and never reused.
    pub id: i64,
    /// Human-facing version number, a gapless sequence starting at 1.
    pub version: i64,
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature in `[0.0, 1.0]`.
    pub temperature: f64,
    /// Completion token budget in `(0, 32768]`.
    pub max_tokens: i32,
    /// System instruction; empty means none.
    pub system_prompt: String,
    /// Whether this version currently governs completion defaults.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<modelgate_data::ConfigVersionRow> for ConfigVersion {
    fn from(row: modelgate_data::ConfigVersionRow) -> Self {
        Self {
            id: row.id,
            version: row.version,
            model: row.model,
            temperature: row.temperature,
            max_tokens: row.max_tokens,
            system_prompt: row.system_prompt,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Payload for creating a new configuration version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConfigVersion {
    /// Upstream model identifier. Required, non-empty.
    pub model: String,
    /// Sampling temperature; defaults to 0.7.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Completion token budget; defaults to 1000.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
    /// Optional system instruction; defaults to empty.
    #[serde(default)]
    pub system_prompt: String,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

const fn default_max_tokens() -> i32 {
    DEFAULT_MAX_TOKENS
}

/// The configuration that applies to a completion call right now.
///
/// Either a published version or, when nothing is active, the hard-coded
/// fallback (`id` and `created_at` absent, `version` 0, `is_active` false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Storage id of the active version, if one exists.
    pub id: Option<i64>,
    /// Version number; 0 for the fallback.
    pub version: i64,
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token budget.
    pub max_tokens: i32,
    /// System instruction; empty means none.
    pub system_prompt: String,
    /// Whether a published version is in effect.
    pub is_active: bool,
    /// Creation timestamp of the active version, if one exists.
    pub created_at: Option<DateTime<Utc>>,
}

impl EffectiveConfig {
    /// The fallback applied when no configuration has ever been published.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            id: None,
            version: 0,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: String::new(),
            is_active: false,
            created_at: None,
        }
    }
}

impl From<ConfigVersion> for EffectiveConfig {
    fn from(version: ConfigVersion) -> Self {
        Self {
            id: Some(version.id),
            version: version.version,
            model: version.model,
            temperature: version.temperature,
            max_tokens: version.max_tokens,
            system_prompt: version.system_prompt,
            is_active: version.is_active,
            created_at: Some(version.created_at),
        }
    }
}

/// Confirmation returned by a successful publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutcome {
    /// Constant `"ok"` marker preserved for API compatibility.
    pub status: String,
    /// Storage id of the now-active version.
    pub active_id: i64,
    /// Version number of the now-active version.
    pub active_version: i64,
}
