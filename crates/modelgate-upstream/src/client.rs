//! HTTP client for OpenRouter-compatible chat-completion endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UpstreamError;

/// Completion endpoint used when no override is configured.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved parameters for a single completion call.
///
/// The caller has already applied the active-configuration fallback; this is
/// a plain snapshot, not a live view of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// User message to forward.
    pub message: String,
    /// Upstream model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token budget.
    pub max_tokens: i32,
    /// System instruction; empty means none.
    pub system_prompt: String,
}

/// Abstraction over the completion backend used by the API layer.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Forward a message to the upstream API and return the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError>;
}

/// Compose the prompt forwarded upstream.
///
/// When a system instruction is present the two segments are labeled so the
/// receiving model can distinguish instruction from query; this format is part
/// of the wire contract and must not change.
#[must_use]
pub fn compose_prompt(system_prompt: &str, message: &str) -> String {
    if system_prompt.is_empty() {
        message.to_string()
    } else {
        format!("System: {system_prompt}\n\nUser: {message}")
    }
}

/// Reqwest-backed client for an OpenRouter-compatible endpoint.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenRouterClient {
    /// Build a client for `endpoint`, authenticating with `api_key` when one
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| UpstreamError::Transport { source })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, UpstreamError> {
        let prompt = compose_prompt(&request.system_prompt, &request.message);
        let payload = WireRequest {
            model: &request.model,
            messages: vec![WireMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut outbound = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            outbound = outbound.bearer_auth(key);
        }

        let response = outbound
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|source| UpstreamError::Transport { source })?;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|source| UpstreamError::Transport { source })?;

        debug!(model = %request.model, choices = body.choices.len(), "completion received");

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(UpstreamError::MalformedResponse)
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    max_tokens: i32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireContent,
}

#[derive(Deserialize)]
struct WireContent {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            message: "Hello there".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            system_prompt: String::new(),
        }
    }

    #[test]
    fn prompt_without_system_instruction_is_untouched() {
        assert_eq!(compose_prompt("", "What is Rust?"), "What is Rust?");
    }

    #[test]
    fn prompt_with_system_instruction_labels_both_segments() {
        assert_eq!(
            compose_prompt("You are terse.", "What is Rust?"),
            "System: You are terse.\n\nUser: What is Rust?"
        );
    }

    #[tokio::test]
    async fn complete_posts_wire_format_and_returns_content() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("authorization", "Bearer secret-key")
                .json_body(json!({
                    "model": "openai/gpt-4o-mini",
                    "messages": [{ "role": "user", "content": "Hello there" }],
                    "temperature": 0.7,
                    "max_tokens": 1000
                }));
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": "General Kenobi" } }]
            }));
        });

        let client = OpenRouterClient::new(
            format!("{}/api/v1/chat/completions", server.base_url()),
            Some("secret-key".to_string()),
        )
        .expect("client builds");

        let text = client
            .complete(sample_request())
            .await
            .expect("completion succeeds");
        assert_eq!(text, "General Kenobi");
        mock.assert();
    }

    #[tokio::test]
    async fn complete_forwards_composed_system_prompt() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/completions").json_body(json!({
                "model": "openai/gpt-4o-mini",
                "messages": [{
                    "role": "user",
                    "content": "System: Answer in French.\n\nUser: Hello there"
                }],
                "temperature": 0.7,
                "max_tokens": 1000
            }));
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Bonjour" } }]
            }));
        });

        let client = OpenRouterClient::new(format!("{}/v1/completions", server.base_url()), None)
            .expect("client builds");

        let text = client
            .complete(CompletionRequest {
                system_prompt: "Answer in French.".to_string(),
                ..sample_request()
            })
            .await
            .expect("completion succeeds");
        assert_eq!(text, "Bonjour");
        mock.assert();
    }

    #[tokio::test]
    async fn non_success_status_carries_upstream_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/v1/completions");
            then.status(402).body("insufficient credits");
        });

        let client = OpenRouterClient::new(format!("{}/v1/completions", server.base_url()), None)
            .expect("client builds");

        let err = client
            .complete(sample_request())
            .await
            .expect_err("status error");
        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 402);
                assert_eq!(body, "insufficient credits");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choice_list_is_malformed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/v1/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        });

        let client = OpenRouterClient::new(format!("{}/v1/completions", server.base_url()), None)
            .expect("client builds");

        let err = client
            .complete(sample_request())
            .await
            .expect_err("malformed response");
        assert!(matches!(err, UpstreamError::MalformedResponse));
    }
}
