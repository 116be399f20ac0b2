//! Vendor chat provider
//!
//! The vendor accepts the standard request body but rejects it unless
//! streaming is explicitly disabled. Its responses put the reply under
//! top-level `data` or `message` rather than `choices`, which the shared
//! extraction chain already covers.

use async_trait::async_trait;
use serde::Serialize;

use super::standard::ChatBody;
use super::{extract_reply, CompletionError, CompletionProvider, CompletionRequest, UpstreamClient};

/// Request body of the vendor API
#[derive(Debug, Serialize)]
pub struct VendorChatBody<'a> {
    #[serde(flatten)]
    pub chat: ChatBody<'a>,
    pub stream: bool,
}

impl<'a> From<&'a CompletionRequest> for VendorChatBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            chat: ChatBody::from(request),
            stream: false,
        }
    }
}

/// Provider for the vendor-specific chat format
pub struct VendorProvider {
    upstream: UpstreamClient,
}

impl VendorProvider {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl CompletionProvider for VendorProvider {
    fn name(&self) -> &'static str {
        "vendor"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = VendorChatBody::from(request);
        let response = self.upstream.post_json(&body).await?;
        Ok(extract_reply(&response))
    }
}
