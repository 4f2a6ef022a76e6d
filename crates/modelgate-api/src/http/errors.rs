//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::http::constants::{
    PROBLEM_BAD_REQUEST, PROBLEM_INTERNAL, PROBLEM_NOT_FOUND, PROBLEM_UNAUTHORIZED,
    PROBLEM_UPSTREAM, PROBLEM_VALIDATION,
};
use crate::models::ProblemDetails;

/// Structured API error with optional problem-details fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    title: &'static str,
    detail: Option<String>,
    field: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            field: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            PROBLEM_UNAUTHORIZED,
            "authentication required",
        )
        .with_detail(detail)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    pub(crate) fn validation(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            PROBLEM_VALIDATION,
            "validation failed",
        )
        .with_detail(detail)
    }

    pub(crate) fn bad_gateway(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            PROBLEM_UPSTREAM,
            "upstream completion failed",
        )
        .with_detail(detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            field: self.field,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Project a configuration-layer failure onto the API error taxonomy.
pub(crate) fn map_config_error(err: anyhow::Error, context: &'static str) -> ApiError {
    match err.downcast::<modelgate_config::ConfigError>() {
        Ok(config_err) => match &config_err {
            modelgate_config::ConfigError::InvalidField { field, .. } => {
                warn!(error = %config_err, "{context}");
                ApiError::validation(config_err.to_string()).with_field(*field)
            }
            modelgate_config::ConfigError::VersionNotFound { .. } => {
                warn!(error = %config_err, "{context}");
                ApiError::not_found(config_err.to_string())
            }
            modelgate_config::ConfigError::DataAccess { .. } => {
                error!(error = %config_err, "{context}");
                ApiError::internal(context)
            }
        },
        Err(other) => {
            error!(error = %other, "{context}");
            ApiError::internal(context)
        }
    }
}

/// Project an upstream completion failure onto the API error taxonomy.
pub(crate) fn map_upstream_error(err: &modelgate_upstream::UpstreamError) -> ApiError {
    error!(error = %err, "upstream completion call failed");
    ApiError::bad_gateway(err.to_string())
}
