//! Server configuration, read once at start from flags and environment.

use std::net::SocketAddr;

use batchquery_core::MAX_IMAGES;
use clap::Parser;
use vision_gateway::{
    GatewayConfig, LiveConfig, Mode, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};

/// Multipart bodies carry whole images; axum's 2 MiB default is too small.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Parser)]
#[command(name = "batchqueryd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Answer one question about each of a batch of images", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BATCHQUERY_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// `mock` answers without a network call; `live` asks the vision model
    #[arg(long, env = "BATCHQUERY_MODE", default_value = "live")]
    pub mode: Mode,

    /// API key for the live vision model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Vision model name
    #[arg(long, env = "OPENAI_MODEL_NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Chat-completions endpoint
    #[arg(long, env = "OPENAI_CHAT_COMPLETIONS_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Completion budget per image
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Largest batch accepted per request
    #[arg(long, default_value_t = MAX_IMAGES)]
    pub max_images: usize,

    /// Request body limit in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    pub json: bool,
}

impl ServerConfig {
    pub fn gateway_config(&self) -> GatewayConfig {
        let live = LiveConfig::default()
            .with_api_key(self.openai_api_key.clone())
            .with_model(&self.model)
            .with_endpoint(&self.endpoint)
            .with_max_tokens(self.max_tokens);
        GatewayConfig {
            mode: self.mode,
            live,
        }
    }
}
