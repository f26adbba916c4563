use anyhow::{Context, Result};
use batchqueryd::{app, serve, AppState, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::Level;
use vision_gateway::ModelGateway;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    batchquery_core::init_tracing(config.json, level);

    let gateway = ModelGateway::new(config.gateway_config())
        .context("Failed to build the model gateway")?;
    let router = app(
        AppState::new(gateway, config.max_images),
        config.max_body_bytes,
    );

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    serve(listener, router).await.context("Server error")?;
    Ok(())
}
