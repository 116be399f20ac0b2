//! Completion adapter
//!
//! Turns a session's history into a single reply string from the upstream
//! language-model endpoint. Two wire formats are supported behind the
//! [`CompletionProvider`] trait, plus a deterministic mock used when no
//! upstream credential is configured.

pub mod extract;
pub mod mock;
pub mod standard;
pub mod upstream;
pub mod vendor;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, UpstreamFormat};
use crate::session::Turn;

pub use self::extract::extract_reply;
pub use self::mock::MockProvider;
pub use self::standard::StandardProvider;
pub use self::upstream::UpstreamClient;
pub use self::vendor::VendorProvider;

/// Lowest temperature accepted from clients
pub const MIN_TEMPERATURE: f64 = 0.0;
/// Highest temperature accepted from clients
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Everything an upstream needs to generate one reply
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<Turn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Content of the most recent user turn, if any
    pub fn latest_user_message(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == crate::session::Role::User)
            .map(|t| t.content.as_str())
    }
}

/// Reasons an upstream call can fail
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned an unparseable body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl CompletionError {
    /// Human-readable reply shown to the user in place of a completion
    pub fn apology(&self) -> String {
        format!("Sorry, I ran into a problem: {}", self)
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Transport(_) => "transport",
            CompletionError::Status { .. } => "status",
            CompletionError::MalformedBody(_) => "malformed_body",
        }
    }
}

/// A backend that produces one reply for a conversation
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Generate a reply for the given conversation
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Build the HTTP client used for upstream calls
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(16)
        .timeout(Duration::from_secs(config.upstream_timeout_seconds))
        .build()
        .context("Failed to build upstream HTTP client")
}

/// Select the provider implementation for this configuration
///
/// A missing API key selects [`MockProvider`] when mock mode is allowed.
pub fn provider_from_config(
    client: reqwest::Client,
    config: &Config,
) -> Result<Arc<dyn CompletionProvider>> {
    let Some(api_key) = config.upstream_api_key.clone() else {
        if !config.allow_mock_mode {
            bail!("no upstream API key configured and mock mode is disabled");
        }
        warn!("OPENAI_API_KEY not set, using mock responses");
        return Ok(Arc::new(MockProvider::new()));
    };

    let upstream = UpstreamClient::new(client, config.upstream_chat_url(), api_key);
    let provider: Arc<dyn CompletionProvider> = match config.upstream_format {
        UpstreamFormat::Standard => Arc::new(StandardProvider::new(upstream)),
        UpstreamFormat::Vendor => Arc::new(VendorProvider::new(upstream)),
    };

    info!(
        provider = provider.name(),
        model = %config.model,
        url = %config.upstream_chat_url(),
        "Upstream completion provider initialized"
    );
    Ok(provider)
}
