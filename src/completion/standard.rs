//! Standard chat-completions provider

use async_trait::async_trait;
use serde::Serialize;

use super::{extract_reply, CompletionError, CompletionProvider, CompletionRequest, UpstreamClient};
use crate::session::Turn;

/// Request body of the standard chat-completions API
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub temperature: f64,
    pub max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ChatBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.turns,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Provider for upstreams speaking the standard chat-completions format
pub struct StandardProvider {
    upstream: UpstreamClient,
}

impl StandardProvider {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl CompletionProvider for StandardProvider {
    fn name(&self) -> &'static str {
        "standard"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatBody::from(request);
        let response = self.upstream.post_json(&body).await?;
        Ok(extract_reply(&response))
    }
}
