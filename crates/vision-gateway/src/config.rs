//! Gateway configuration
//!
//! The mode is decided once, by whoever builds the [`GatewayConfig`], and
//! handed to [`ModelGateway::new`](crate::ModelGateway::new). Nothing in
//! this crate reads process-wide state on its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default vision-capable model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default completion budget per image
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Mock or live answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fixed answers, no network, no credentials
    Mock,
    /// Calls the external vision model
    Live,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "live" => Ok(Mode::Live),
            other => Err(format!("unknown mode '{other}' (expected 'mock' or 'live')")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Mock => f.write_str("mock"),
            Mode::Live => f.write_str("live"),
        }
    }
}

/// Settings for the live vision model
#[derive(Clone, PartialEq, Eq)]
pub struct LiveConfig {
    /// Bearer credential; absence fails every live call
    pub api_key: Option<String>,
    /// Model name sent with each request
    pub model: String,
    /// Chat-completions URL
    pub endpoint: String,
    /// `max_tokens` sent with each request
    pub max_tokens: u32,
}

impl Default for LiveConfig {
    fn default() -> Self {
        LiveConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LiveConfig {
    /// Set authentication token; blank values count as absent
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for LiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Everything needed to build a [`ModelGateway`](crate::ModelGateway)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub mode: Mode,
    pub live: LiveConfig,
}

impl GatewayConfig {
    pub fn mock() -> Self {
        GatewayConfig {
            mode: Mode::Mock,
            live: LiveConfig::default(),
        }
    }

    pub fn live(live: LiveConfig) -> Self {
        GatewayConfig {
            mode: Mode::Live,
            live,
        }
    }
}
