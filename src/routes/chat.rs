//! Chat endpoint
//!
//! Resolves the session, records the user turn, asks the completion provider
//! for a reply and records it. Upstream failures never fail the request: the
//! user gets an apology text in an otherwise normal reply.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    completion::{upstream::truncate, CompletionRequest, MAX_TEMPERATURE, MIN_TEMPERATURE},
    error::{ApiResponse, AppError, AppResult},
    routes::metrics::{record_request, record_upstream_failure, set_active_sessions},
    session::Turn,
    AppState,
};

/// Temperature used when the client does not send one
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Characters of the user message included in request logs
const LOG_PREVIEW_CHARS: usize = 50;

/// Chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Payload of a successful chat response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
}

/// Handle a chat message
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<ChatReply>>> {
    let start_time = Instant::now();

    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))?;
    let temperature = validate_temperature(request.temperature.unwrap_or(DEFAULT_TEMPERATURE))?;

    info!(
        message = %truncate(&request.message, LOG_PREVIEW_CHARS),
        session_id = ?request.session_id,
        "Received chat request"
    );

    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut session = state.sessions.lock(&session_id).await;
    set_active_sessions(state.sessions.len());
    session.push(Turn::user(request.message));

    let completion = CompletionRequest {
        model: state.config.model.clone(),
        turns: session.turns(),
        temperature,
        max_tokens: state.config.max_tokens,
    };

    let provider = state.completion.name();
    let response = match state.completion.complete(&completion).await {
        Ok(reply) => {
            session.push(Turn::assistant(reply.clone()));
            record_request("success", &completion.model, start_time.elapsed().as_secs_f64());
            reply
        }
        Err(err) => {
            error!(
                session_id = %session.id(),
                provider = provider,
                error = %err,
                "Error calling upstream completion API"
            );
            record_upstream_failure(provider, err.kind());
            record_request("upstream_error", &completion.model, start_time.elapsed().as_secs_f64());
            err.apology()
        }
    };
    let history_len = session.len();
    let session_age_secs = (Utc::now() - session.created_at()).num_seconds();
    drop(session);

    info!(
        session_id = %session_id,
        provider = provider,
        history_len = history_len,
        session_age_secs = session_age_secs,
        duration_ms = %format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0),
        "Generated response for session"
    );

    Ok(Json(ApiResponse::ok(ChatReply {
        response,
        session_id,
    })))
}

/// Reject temperatures outside the accepted range
pub fn validate_temperature(temperature: f64) -> AppResult<f64> {
    if temperature.is_finite() && (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(AppError::InvalidRequest(format!(
            "temperature must be between {:.1} and {:.1}, got {}",
            MIN_TEMPERATURE, MAX_TEMPERATURE, temperature
        )))
    }
}
