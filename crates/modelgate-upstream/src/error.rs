//! Error types for upstream completion calls.

use thiserror::Error;

/// Errors raised when forwarding a message to the completion API.
///
/// Failures are surfaced to the caller as-is; this client never retries.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream API answered with a non-success status.
    #[error("upstream completion API returned status {status}: {body}")]
    Status {
        /// HTTP status code returned by the upstream API.
        status: u16,
        /// Response body, carried verbatim for operator visibility.
        body: String,
    },
    /// The request could not be sent or the response could not be read.
    #[error("upstream completion API transport failed")]
    Transport {
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The upstream API answered 2xx but the body held no completion text.
    #[error("upstream completion API response carried no completion content")]
    MalformedResponse,
}
