//! Error types for configuration operations.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Human-readable error description.
        message: String,
    },
    /// Referenced configuration version does not exist.
    #[error("configuration version {id} not found")]
    VersionNotFound {
        /// Storage id supplied by the caller.
        id: i64,
    },
    /// Data layer operation failed.
    #[error("data access failed")]
    DataAccess {
        /// Operation identifier.
        operation: &'static str,
        /// Source data-layer error.
        source: modelgate_data::DataError,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    pub(crate) const fn data(operation: &'static str, source: modelgate_data::DataError) -> Self {
        Self::DataAccess { operation, source }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
