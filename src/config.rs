//! Configuration management for the chat gateway
//!
//! Configuration is loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Wire format spoken by the upstream completion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpstreamFormat {
    /// Standard chat-completions body
    #[default]
    Standard,
    /// Vendor body that requires an explicit `stream: false`
    Vendor,
}

impl FromStr for UpstreamFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "openai" => Ok(Self::Standard),
            "vendor" => Ok(Self::Vendor),
            other => bail!("unknown upstream format '{}'", other),
        }
    }
}

impl fmt::Display for UpstreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Vendor => f.write_str("vendor"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{}'", other),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream API key. `None` switches the gateway to mock replies.
    pub upstream_api_key: Option<String>,
    /// Upstream API base URL
    pub upstream_base_url: String,
    /// Path appended to the base URL for chat requests
    pub upstream_chat_path: String,
    /// Wire format of the upstream
    pub upstream_format: UpstreamFormat,
    /// Model name sent upstream
    pub model: String,
    /// Upstream request timeout (in seconds)
    pub upstream_timeout_seconds: u64,
    /// Max-token cap sent with every completion request
    pub max_tokens: u32,

    /// Maximum number of turns retained per session
    pub max_session_turns: usize,
    /// Fall back to mock replies when no API key is set
    pub allow_mock_mode: bool,

    /// Log output format
    pub log_format: LogFormat,
    /// Optional file that receives a copy of every log line
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            upstream_api_key: None,
            upstream_base_url: "https://api.openai.com/v1".to_string(),
            upstream_chat_path: "/chat/completions".to_string(),
            upstream_format: UpstreamFormat::Standard,
            model: "gpt-3.5-turbo".to_string(),
            upstream_timeout_seconds: 30,
            max_tokens: 1000,
            max_session_turns: 20,
            allow_mock_mode: true,
            log_format: LogFormat::Text,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: var("MCP_SERVICE_HOST").unwrap_or(defaults.host),
            port: parse_or(var("MCP_SERVICE_PORT"), defaults.port)
                .context("Invalid MCP_SERVICE_PORT")?,

            upstream_api_key: var("OPENAI_API_KEY"),
            upstream_base_url: var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_chat_path: var("UPSTREAM_CHAT_PATH")
                .map(|p| {
                    if p.starts_with('/') {
                        p
                    } else {
                        format!("/{}", p)
                    }
                })
                .unwrap_or(defaults.upstream_chat_path),
            upstream_format: parse_or(var("UPSTREAM_FORMAT"), defaults.upstream_format)
                .context("Invalid UPSTREAM_FORMAT")?,
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
            upstream_timeout_seconds: parse_or(
                var("UPSTREAM_TIMEOUT_SECONDS"),
                defaults.upstream_timeout_seconds,
            )
            .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?,
            max_tokens: parse_or(var("UPSTREAM_MAX_TOKENS"), defaults.max_tokens)
                .context("Invalid UPSTREAM_MAX_TOKENS")?,

            max_session_turns: parse_or(var("SESSION_MAX_TURNS"), defaults.max_session_turns)
                .context("Invalid SESSION_MAX_TURNS")?,
            allow_mock_mode: parse_flag(var("ALLOW_MOCK_MODE"), defaults.allow_mock_mode)
                .context("Invalid ALLOW_MOCK_MODE")?,

            log_format: parse_or(var("LOG_FORMAT"), defaults.log_format)
                .context("Invalid LOG_FORMAT")?,
            log_file: var("LOG_FILE").map(|p| PathBuf::from(p.trim())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether chat requests are answered by the local mock provider
    pub fn is_mock_mode(&self) -> bool {
        self.upstream_api_key.is_none()
    }

    /// Full URL of the upstream chat endpoint
    pub fn upstream_chat_url(&self) -> String {
        format!("{}{}", self.upstream_base_url, self.upstream_chat_path)
    }

    fn validate(&self) -> Result<()> {
        if self.max_session_turns == 0 {
            bail!("SESSION_MAX_TURNS must be at least 1");
        }
        if self.upstream_timeout_seconds == 0 {
            bail!("UPSTREAM_TIMEOUT_SECONDS must be at least 1");
        }
        if self.upstream_api_key.is_none() && !self.allow_mock_mode {
            bail!("OPENAI_API_KEY must be set when ALLOW_MOCK_MODE is disabled");
        }
        Ok(())
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("'{}': {}", raw, e)),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => bail!("'{}': expected true, false, 1 or 0", raw),
    }
}
