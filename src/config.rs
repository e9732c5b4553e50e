//! Runtime configuration for the relay.
//!
//! Everything the server and the summarisation client need lives in one
//! [`AppConfig`], constructed once at process start and shared by `Arc`.
//! Handlers and the summariser read the struct, never the process
//! environment, so tests can inject a credential or point the client at a
//! different endpoint without mutating env vars.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Fallback listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Default completion token budget per summary.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Default per-request timeout for the summarisation call, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Request bodies above this size are rejected. Bounds memory per request.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Default chat-completions endpoint.
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default summarisation model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the relay server and its summarisation client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Port to listen on. Read from `PORT`. Default: 3000.
    pub port: u16,

    /// Summarisation API credential. Read from `OPENAI_API_KEY`. `None` or
    /// blank means every summarisation attempt fails before the network.
    pub openai_api_key: Option<String>,

    /// Chat-completions endpoint URL. Read from `OPENAI_API_URL`.
    pub chat_completions_url: String,

    /// Model identifier sent with every request. Read from `DOCRELAY_MODEL`.
    pub model: String,

    /// Completion token budget when the caller supplies none. Default: 200.
    pub max_tokens: u32,

    /// Timeout for the summarisation HTTP call, in seconds. Read from
    /// `DOCRELAY_API_TIMEOUT_SECS`. Default: 60.
    ///
    /// The upstream service this replaces ran with no timeout at all; an
    /// unbounded network call can pin a request task forever, so the relay
    /// enforces one and makes it configurable.
    pub api_timeout_secs: u64,

    /// Maximum accepted request body size in bytes. Default: 50 MB.
    pub max_body_bytes: usize,

    /// Origins allowed by CORS. Read from `DOCRELAY_ALLOWED_ORIGINS`
    /// (comma-separated). Defaults to common local dev origins.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            openai_api_key: None,
            chat_completions_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl AppConfig {
    /// Build a config from the process environment, falling back to the
    /// documented defaults for anything unset or blank.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(key) = env_non_empty("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Some(port) = env_non_empty("PORT").and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(url) = env_non_empty("OPENAI_API_URL") {
            config.chat_completions_url = url;
        }
        if let Some(model) = env_non_empty("DOCRELAY_MODEL") {
            config.model = model;
        }
        if let Some(secs) = env_non_empty("DOCRELAY_API_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            config.api_timeout_secs = secs;
        }
        if let Some(origins) = env_non_empty("DOCRELAY_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        config
    }

    /// The socket address the server binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Whether a usable credential is configured.
    pub fn credential_configured(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
