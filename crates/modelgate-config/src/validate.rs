//! Validation helpers for configuration payloads.

use crate::defaults::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, MAX_TOKENS_CEILING};
use crate::error::{ConfigError, ConfigResult};
use crate::model::NewConfigVersion;

/// Check every field constraint on a new-version payload.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` naming the first field that violates
/// its constraint; the payload is never clamped or coerced.
pub fn validate_new_version(input: &NewConfigVersion) -> ConfigResult<()> {
    if input.model.trim().is_empty() {
        return Err(ConfigError::invalid("model", "must not be empty"));
    }

    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&input.temperature) {
        return Err(ConfigError::invalid(
            "temperature",
            "must be between 0.0 and 1.0",
        ));
    }

    if input.max_tokens <= 0 || input.max_tokens > MAX_TOKENS_CEILING {
        return Err(ConfigError::invalid(
            "max_tokens",
            format!("must be between 1 and {MAX_TOKENS_CEILING}"),
        ));
    }

    Ok(())
}

/// Resolve the history page size: default when absent, clamped to `1..=200`.
#[must_use]
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}
