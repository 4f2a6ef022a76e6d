//! Message-forwarding endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use modelgate_upstream::CompletionRequest;

use crate::http::errors::{ApiError, map_config_error, map_upstream_error};
use crate::models::{ChatRequest, ChatResponse, ConfigUsed, EvaluateRequest, EvaluateResponse};
use crate::state::ApiState;

/// `POST /chat`: forward a message using per-field configuration fallback.
///
/// The effective configuration is consulted only when at least one tuning
/// field was left unset; a request that supplies all four fields never reads
/// the store. The echoed `config_used` is exactly what went upstream.
pub(crate) async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let ChatRequest {
        message,
        model,
        temperature,
        max_tokens,
        system_prompt,
    } = payload;

    let (model, temperature, max_tokens, system_prompt) =
        match (model, temperature, max_tokens, system_prompt) {
            (Some(model), Some(temperature), Some(max_tokens), Some(system_prompt)) => {
                (model, temperature, max_tokens, system_prompt)
            }
            (model, temperature, max_tokens, system_prompt) => {
                let effective = state.config.resolve_effective().await.map_err(|err| {
                    map_config_error(err, "failed to resolve effective configuration")
                })?;
                (
                    model.unwrap_or(effective.model),
                    temperature.unwrap_or(effective.temperature),
                    max_tokens.unwrap_or(effective.max_tokens),
                    system_prompt.unwrap_or(effective.system_prompt),
                )
            }
        };

    let config_used = ConfigUsed {
        model,
        temperature,
        max_tokens,
        system_prompt,
    };

    let response = forward(&state, message, &config_used).await?;

    Ok(Json(ChatResponse {
        response,
        config_used,
    }))
}

/// `POST /evaluate`: wrap a study answer in the review instruction and
/// forward it using the effective configuration.
pub(crate) async fn evaluate(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let effective = state
        .config
        .resolve_effective()
        .await
        .map_err(|err| map_config_error(err, "failed to resolve effective configuration"))?;

    let config_used = ConfigUsed {
        model: effective.model,
        temperature: effective.temperature,
        max_tokens: effective.max_tokens,
        system_prompt: effective.system_prompt,
    };
    let message = format!(
        "Please review this study answer and give concise feedback: {}",
        payload.input_text
    );

    let feedback = forward(&state, message, &config_used).await?;

    Ok(Json(EvaluateResponse { feedback }))
}

async fn forward(
    state: &ApiState,
    message: String,
    config_used: &ConfigUsed,
) -> Result<String, ApiError> {
    state.metrics.observe_completion_request();
    state
        .completion
        .complete(CompletionRequest {
            message,
            model: config_used.model.clone(),
            temperature: config_used.temperature,
            max_tokens: config_used.max_tokens,
            system_prompt: config_used.system_prompt.clone(),
        })
        .await
        .map_err(|err| {
            state.metrics.observe_completion_failure();
            map_upstream_error(&err)
        })
}
