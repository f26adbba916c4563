//! BatchQuery daemon
//!
//! Receives a question plus up to four images as `multipart/form-data`,
//! asks the vision model about each image concurrently and answers with
//! `{"results": [{"response": "..."}, ...]}` in upload order.

pub mod config;
pub mod error;
pub mod handler;
pub mod multipart;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use batchquery_core::METRICS;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
pub use error::{ApiError, ApiResult};
pub use handler::AppState;

/// Path of the batch endpoint
pub const ANALYZE_IMAGES_PATH: &str = "/api/analyze-images";

/// Build the router. `max_body_bytes` bounds the whole multipart body.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            ANALYZE_IMAGES_PATH,
            post(handler::analyze_images).fallback(handler::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(Arc::new(state))
}

/// Serve until Ctrl-C or SIGTERM, then flush counters.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "batchqueryd listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    METRICS.flush();
    info!("batchqueryd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, shutting down"),
        _ = terminate => info!("terminate signal received, shutting down"),
    }
}
