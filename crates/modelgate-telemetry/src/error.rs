//! Error types for telemetry setup and rendering.

use thiserror::Error;

/// Errors raised while wiring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global tracing subscriber could not be installed.
    #[error("failed to install tracing subscriber: {detail}")]
    SubscriberInit {
        /// Installation failure detail.
        detail: String,
    },
    /// A metric could not be registered.
    #[error("failed to register metric")]
    MetricRegistration {
        /// Source registry error.
        #[source]
        source: prometheus::Error,
    },
    /// The metrics snapshot could not be rendered.
    #[error("failed to render metrics")]
    MetricsRender {
        /// Source encoder error.
        #[source]
        source: prometheus::Error,
    },
}
