//! Router construction and server host for the API.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{MatchedPath, Request as ExtractRequest, State},
    http::{HeaderName, Method, Request, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use modelgate_telemetry::Metrics;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::config::{SharedCompletion, SharedConfig};
use crate::http::auth::{AdminAuth, require_admin_token};
use crate::http::chat::{chat, evaluate};
use crate::http::configs::{
    create_config, get_active_config, get_config_history, get_effective_config, publish_config,
};
use crate::http::constants::{HEADER_ADMIN_TOKEN, HEADER_REQUEST_ID};
use crate::http::health::{healthz, list_models, metrics};
use crate::state::ApiState;

/// Errors raised while hosting the API.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener could not be bound.
    #[error("failed to bind API listener")]
    Bind {
        /// Source IO error.
        #[source]
        source: io::Error,
    },
    /// The server terminated unexpectedly.
    #[error("API server terminated unexpectedly")]
    Serve {
        /// Source IO error.
        #[source]
        source: io::Error,
    },
}

/// Axum router wrapper that hosts the modelgate API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the API server with shared dependencies wired through
    /// application state.
    #[must_use]
    pub fn new(
        config: SharedConfig,
        completion: SharedCompletion,
        auth: AdminAuth,
        telemetry: Metrics,
    ) -> Self {
        let state = Arc::new(ApiState::new(config, completion, auth, telemetry));

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, HeaderName::from_static(HEADER_ADMIN_TOKEN)]);

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );

        let layered = ServiceBuilder::new()
            .layer(modelgate_telemetry::propagate_request_id_layer())
            .layer(modelgate_telemetry::set_request_id_layer())
            .layer(trace_layer);

        let router = Self::build_router(&state)
            .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
            .layer(layered)
            .layer(cors_layer)
            .with_state(state);

        Self { router }
    }

    fn build_router(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        Self::public_routes().merge(Self::admin_routes(state))
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/metrics", get(metrics))
            .route("/config/active", get(get_active_config))
            .route("/config/history", get(get_config_history))
            .route("/api/config", get(get_effective_config))
            .route("/api/models", get(list_models))
            .route("/chat", post(chat))
            .route("/evaluate", post(evaluate))
    }

    fn admin_routes(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let require_admin = middleware::from_fn_with_state(state.clone(), require_admin_token);

        Router::new()
            .route(
                "/config",
                post(create_config).route_layer(require_admin.clone()),
            )
            .route(
                "/config/{id}/publish",
                post(publish_config).route_layer(require_admin),
            )
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server
    /// terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ApiServerError> {
        tracing::info!("Starting API on {}", addr);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}

async fn track_metrics(
    State(state): State<Arc<ApiState>>,
    req: ExtractRequest,
    next: Next,
) -> Response {
    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_string(),
        |matched| matched.as_str().to_string(),
    );
    let response = next.run(req).await;
    state
        .metrics
        .observe_http_request(&route, response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{StubBackend, StubStore, sample_version};
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server_with(auth: AdminAuth, store: StubStore) -> ApiServer {
        ApiServer::new(
            Arc::new(store),
            Arc::new(StubBackend::replying("ok")),
            auth,
            Metrics::new().expect("metrics"),
        )
    }

    fn create_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/config")
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(HEADER_ADMIN_TOKEN, token);
        }
        builder
            .body(Body::from(
                r#"{"model":"openai/gpt-4o-mini","temperature":0.7,"max_tokens":1000,"system_prompt":""}"#,
            ))
            .expect("request builds")
    }

    #[tokio::test]
    async fn mutating_routes_reject_missing_or_wrong_tokens() {
        let server = server_with(
            AdminAuth::new(Some("s3cret".to_string())),
            StubStore::creating(sample_version(1, 1, "openai/gpt-4o-mini", false)),
        );

        let missing = server
            .router()
            .clone()
            .oneshot(create_request(None))
            .await
            .expect("response");
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = server
            .router()
            .clone()
            .oneshot(create_request(Some("nope")))
            .await
            .expect("response");
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let publish = Request::builder()
            .method(Method::POST)
            .uri("/config/1/publish")
            .body(Body::empty())
            .expect("request builds");
        let unauthorized = server
            .router()
            .clone()
            .oneshot(publish)
            .await
            .expect("response");
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn matching_token_reaches_the_handler() {
        let server = server_with(
            AdminAuth::new(Some("s3cret".to_string())),
            StubStore::creating(sample_version(1, 1, "openai/gpt-4o-mini", false)),
        );

        let response = server
            .router()
            .clone()
            .oneshot(create_request(Some("s3cret")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn open_mode_leaves_mutations_ungated() {
        let server = server_with(
            AdminAuth::new(None),
            StubStore::creating(sample_version(1, 1, "openai/gpt-4o-mini", false)),
        );

        let response = server
            .router()
            .clone()
            .oneshot(create_request(None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn read_routes_never_require_a_token() {
        let server = server_with(AdminAuth::new(Some("s3cret".to_string())), StubStore::default());

        for uri in ["/healthz", "/config/active", "/config/history", "/api/config", "/api/models"] {
            let request = Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .expect("request builds");
            let response = server
                .router()
                .clone()
                .oneshot(request)
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK, "route {uri}");
        }
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_request_counters() {
        let server = server_with(AdminAuth::new(None), StubStore::default());
        let router = server.router().clone();

        let health = Request::builder()
            .method(Method::GET)
            .uri("/healthz")
            .body(Body::empty())
            .expect("request builds");
        router.clone().oneshot(health).await.expect("response");

        let scrape = Request::builder()
            .method(Method::GET)
            .uri("/metrics")
            .body(Body::empty())
            .expect("request builds");
        let response = router.oneshot(scrape).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("modelgate_http_requests_total"));
        assert!(text.contains("/healthz"));
    }
}
