//! Upstream HTTP transport
//!
//! Shared by every wire format: one JSON POST with bearer authorization,
//! classified into a parsed body or a [`CompletionError`].

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::CompletionError;

/// Longest upstream error body kept in a [`CompletionError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Authenticated client for the upstream chat endpoint
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl UpstreamClient {
    /// Create a client posting to `url`
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// POST a JSON body and return the parsed JSON response
    #[instrument(skip(self, body), fields(url = %self.url))]
    pub async fn post_json<T: Serialize + Sync>(&self, body: &T) -> Result<Value, CompletionError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.url, error = %e, "Failed to send request to upstream");
                e
            })?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, body_len = text.len(), "Received response from upstream");

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY_CHARS),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
