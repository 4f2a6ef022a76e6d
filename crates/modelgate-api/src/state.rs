//! API application state shared across handlers.

use modelgate_telemetry::Metrics;

use crate::config::{SharedCompletion, SharedConfig};
use crate::http::auth::AdminAuth;

/// Dependencies wired through every request handler.
pub struct ApiState {
    /// Configuration backend.
    pub config: SharedConfig,
    /// Upstream completion backend.
    pub completion: SharedCompletion,
    /// Admin token policy for mutating routes.
    pub auth: AdminAuth,
    /// Process-wide metrics registry.
    pub metrics: Metrics,
}

impl ApiState {
    /// Bundle the shared dependencies into handler state.
    #[must_use]
    pub fn new(
        config: SharedConfig,
        completion: SharedCompletion,
        auth: AdminAuth,
        metrics: Metrics,
    ) -> Self {
        Self {
            config,
            completion,
            auth,
            metrics,
        }
    }
}
