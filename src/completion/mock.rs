//! Local mock provider used when no upstream credential is configured

use async_trait::async_trait;

use super::{CompletionError, CompletionProvider, CompletionRequest};

/// Prefix of every mock reply
pub const MOCK_REPLY_PREFIX: &str = "Received your message: ";

const MOCK_REPLY_SUFFIX: &str =
    "\n\nThis is a mock response because no upstream API key is configured.";

/// Echoes the latest user message back. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    /// The reply produced for a given user message
    pub fn reply_for(message: &str) -> String {
        format!("{}{}{}", MOCK_REPLY_PREFIX, message, MOCK_REPLY_SUFFIX)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(Self::reply_for(request.latest_user_message().unwrap_or_default()))
    }
}
