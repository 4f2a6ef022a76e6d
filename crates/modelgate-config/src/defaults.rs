//! Default identifiers and limits for configuration records.
//!
//! # Design
//! - Centralize the fallback configuration so every caller resolves the same
//!   values when no version has been published.
//! - Keep range ceilings explicit so validation and docs stay consistent.

/// Model used when no configuration has been published.
pub(crate) const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
/// Sampling temperature used when no configuration has been published.
pub(crate) const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Completion token budget used when no configuration has been published.
pub(crate) const DEFAULT_MAX_TOKENS: i32 = 1000;
/// Upper bound accepted for `max_tokens`.
pub(crate) const MAX_TOKENS_CEILING: i32 = 32_768;
/// History page size when the caller does not supply one.
pub(crate) const DEFAULT_HISTORY_LIMIT: i64 = 20;
/// Largest history page a single request may ask for.
pub(crate) const MAX_HISTORY_LIMIT: i64 = 200;
