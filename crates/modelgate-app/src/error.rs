//! # Design
//!
//! - Centralize application-level errors for bootstrap and serving.
//! - Keep error messages constant while carrying context fields for
//!   debugging.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Environment configuration was missing.
    #[error("missing environment configuration")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: &'static str,
    },
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Field name that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
    /// Configuration service operations failed.
    #[error("configuration operation failed: {detail}")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Failure detail.
        detail: String,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: modelgate_telemetry::TelemetryError,
    },
    /// Upstream client construction failed.
    #[error("upstream client operation failed")]
    Upstream {
        /// Operation identifier.
        operation: &'static str,
        /// Source upstream error.
        source: modelgate_upstream::UpstreamError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: modelgate_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) fn config(operation: &'static str, source: &anyhow::Error) -> Self {
        Self::Config {
            operation,
            detail: format!("{source:#}"),
        }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: modelgate_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn upstream(
        operation: &'static str,
        source: modelgate_upstream::UpstreamError,
    ) -> Self {
        Self::Upstream { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: modelgate_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config("config_service.new", &anyhow::anyhow!("no database"));
        assert!(matches!(config, AppError::Config { .. }));
        assert!(config.to_string().contains("no database"));

        let telemetry = AppError::telemetry(
            "telemetry.init",
            modelgate_telemetry::TelemetryError::SubscriberInit {
                detail: "already installed".to_string(),
            },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
        assert!(telemetry.source().is_some());

        let upstream = AppError::upstream(
            "upstream.new",
            modelgate_upstream::UpstreamError::MalformedResponse,
        );
        assert!(matches!(upstream, AppError::Upstream { .. }));

        let api = AppError::api_server(
            "api.serve",
            modelgate_api::ApiServerError::Serve {
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(api, AppError::ApiServer { .. }));
        assert!(api.source().is_some());
    }
}
