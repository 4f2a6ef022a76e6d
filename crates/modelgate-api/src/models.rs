//! Wire DTOs for the HTTP surface and the static model catalog.

use serde::{Deserialize, Serialize};

/// RFC9457-style problem body returned for every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Machine-readable problem kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short human-readable summary.
    pub title: String,
    /// HTTP status code mirrored into the body.
    pub status: u16,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Field that failed validation, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Query parameters accepted by `GET /config/history`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct HistoryQuery {
    /// Page size; defaults to 20, clamped to 200.
    pub limit: Option<i64>,
}

/// Body accepted by `POST /chat`.
///
/// Every tuning field is optional; an absent field falls back to the
/// effective configuration independently of the others, so an explicit value
/// (including `0.0` or an empty string) is always honored as supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// User message to forward upstream.
    pub message: String,
    /// Override for the upstream model identifier.
    #[serde(default)]
    pub model: Option<String>,
    /// Override for the sampling temperature.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Override for the completion token budget.
    #[serde(default)]
    pub max_tokens: Option<i32>,
    /// Override for the system instruction.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Parameters actually forwarded upstream, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUsed {
    /// Model the completion ran against.
    pub model: String,
    /// Temperature forwarded upstream.
    pub temperature: f64,
    /// Token budget forwarded upstream.
    pub max_tokens: i32,
    /// System instruction forwarded upstream; empty means none.
    pub system_prompt: String,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text.
    pub response: String,
    /// Parameters the completion actually used.
    pub config_used: ConfigUsed,
}

/// Body accepted by `POST /evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    /// Study answer to review.
    pub input_text: String,
}

/// Body returned by `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    /// Generated feedback.
    pub feedback: String,
}

/// One selectable upstream model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelInfo {
    /// Upstream model identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Provider label.
    pub provider: &'static str,
}

/// Catalog of upstream models offered to administrators.
pub const AVAILABLE_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "openai/gpt-4o-mini",
        name: "GPT-4o Mini",
        provider: "OpenAI",
    },
    ModelInfo {
        id: "openai/gpt-4o",
        name: "GPT-4o",
        provider: "OpenAI",
    },
    ModelInfo {
        id: "anthropic/claude-3-haiku",
        name: "Claude 3 Haiku",
        provider: "Anthropic",
    },
    ModelInfo {
        id: "anthropic/claude-3-sonnet",
        name: "Claude 3 Sonnet",
        provider: "Anthropic",
    },
    ModelInfo {
        id: "mistralai/mistral-7b-instruct",
        name: "Mistral 7B",
        provider: "Mistral",
    },
    ModelInfo {
        id: "google/gemini-pro",
        name: "Gemini Pro",
        provider: "Google",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_treats_absent_and_null_fields_as_unset() {
        let minimal: ChatRequest =
            serde_json::from_value(serde_json::json!({ "message": "hi" })).expect("deserializes");
        assert!(minimal.model.is_none());
        assert!(minimal.temperature.is_none());
        assert!(minimal.max_tokens.is_none());
        assert!(minimal.system_prompt.is_none());

        let explicit: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "hi",
            "temperature": 0.0,
            "system_prompt": ""
        }))
        .expect("deserializes");
        assert_eq!(explicit.temperature, Some(0.0));
        assert_eq!(explicit.system_prompt.as_deref(), Some(""));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = AVAILABLE_MODELS.iter().map(|model| model.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AVAILABLE_MODELS.len());
    }
}
