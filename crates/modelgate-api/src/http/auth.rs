//! Admin-token authorization for the mutating HTTP routes.

use std::sync::Arc;

use axum::{extract::State, http::Request, middleware::Next, response::Response};

use crate::http::constants::HEADER_ADMIN_TOKEN;
use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Shared-secret policy gating configuration mutations.
///
/// `None` is open mode: every request is authorized. Open mode is an
/// explicit operating mode for local and development deployments, not a
/// missing check. With a token configured the provided header must match
/// exactly; no trimming, no case folding.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    /// Build the policy; an empty token string counts as unset.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|value| !value.is_empty()),
        }
    }

    /// Whether mutations are currently ungated.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.token.is_none()
    }

    /// Check a provided token against the configured secret.
    pub(crate) fn authorize(&self, provided: Option<&str>) -> Result<(), ApiError> {
        match &self.token {
            None => Ok(()),
            Some(expected) if provided == Some(expected.as_str()) => Ok(()),
            Some(_) => Err(ApiError::unauthorized(
                "missing or invalid x-admin-token header",
            )),
        }
    }
}

/// Middleware applied to `POST /config` and `POST /config/{id}/publish`.
pub(crate) async fn require_admin_token(
    State(state): State<Arc<ApiState>>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = match req.headers().get(HEADER_ADMIN_TOKEN) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::bad_request("admin token header must be valid UTF-8"))?,
        ),
        None => None,
    };

    state.auth.authorize(provided)?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_mode_authorizes_everything() {
        let auth = AdminAuth::new(None);
        assert!(auth.is_open());
        assert!(auth.authorize(None).is_ok());
        assert!(auth.authorize(Some("anything")).is_ok());
    }

    #[test]
    fn empty_token_counts_as_open_mode() {
        let auth = AdminAuth::new(Some(String::new()));
        assert!(auth.is_open());
        assert!(auth.authorize(None).is_ok());
    }

    #[test]
    fn configured_token_requires_exact_match() {
        let auth = AdminAuth::new(Some("s3cret".to_string()));
        assert!(!auth.is_open());
        assert!(auth.authorize(Some("s3cret")).is_ok());
        assert!(auth.authorize(Some("S3CRET")).is_err());
        assert!(auth.authorize(Some("s3cret ")).is_err());
        assert!(auth.authorize(Some("wrong")).is_err());
        assert!(auth.authorize(None).is_err());
    }
}
