//! Prometheus metrics registry shared by the HTTP surface.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::TelemetryError;

/// Handle to the process-wide metrics registry.
///
/// Cloning is cheap; all clones observe the same counters.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    completion_requests: IntCounter,
    completion_failures: IntCounter,
}

impl Metrics {
    /// Create a registry with the modelgate counter set registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be registered.
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("modelgate_http_requests_total", "HTTP requests by route and status"),
            &["route", "status"],
        )
        .map_err(|source| TelemetryError::MetricRegistration { source })?;
        registry
            .register(Box::new(http_requests.clone()))
            .map_err(|source| TelemetryError::MetricRegistration { source })?;

        let completion_requests = IntCounter::new(
            "modelgate_completion_requests_total",
            "Messages forwarded to the upstream completion API",
        )
        .map_err(|source| TelemetryError::MetricRegistration { source })?;
        registry
            .register(Box::new(completion_requests.clone()))
            .map_err(|source| TelemetryError::MetricRegistration { source })?;

        let completion_failures = IntCounter::new(
            "modelgate_completion_failures_total",
            "Upstream completion calls that failed",
        )
        .map_err(|source| TelemetryError::MetricRegistration { source })?;
        registry
            .register(Box::new(completion_failures.clone()))
            .map_err(|source| TelemetryError::MetricRegistration { source })?;

        Ok(Self {
            registry,
            http_requests,
            completion_requests,
            completion_failures,
        })
    }

    /// Count one handled HTTP request.
    pub fn observe_http_request(&self, route: &str, status: u16) {
        self.http_requests
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Count one message forwarded upstream.
    pub fn observe_completion_request(&self) {
        self.completion_requests.inc();
    }

    /// Count one failed upstream call.
    pub fn observe_completion_failure(&self) {
        self.completion_failures.inc();
    }

    /// Render the registry in Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String, TelemetryError> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|source| TelemetryError::MetricsRender { source })?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
