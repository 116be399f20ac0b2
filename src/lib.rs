//! MCP Chat - chat gateway with rolling per-session history
//!
//! Accepts chat messages over HTTP, forwards the conversation to a
//! configurable upstream completion API and returns the generated reply.
//! History is kept in memory, bounded per session.

pub mod completion;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod tools;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::completion::{CompletionProvider, CompletionRequest};
pub use crate::config::Config;
pub use crate::session::SessionStore;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Per-session conversation history
    pub sessions: Arc<SessionStore>,
    /// Backend producing replies (upstream client or local mock)
    pub completion: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with the fixed upstream timeout
        let http_client = completion::http_client(&config)?;

        // Pick the upstream wire format, or the mock when no key is set
        let provider = completion::provider_from_config(http_client, &config)?;

        Ok(Self::with_provider(config, provider))
    }

    /// Create a state around an explicit completion provider
    pub fn with_provider(config: Config, completion: Arc<dyn CompletionProvider>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.max_session_turns));

        Self {
            config,
            start_time: Instant::now(),
            sessions,
            completion,
        }
    }
}
