//! `POST /api/analyze-images`

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use batchquery_core::{
    batch_span, emit_batch_failed, emit_batch_finished, emit_batch_received, emit_batch_rejected,
    QueryResponse, QueryResult, METRICS,
};
use tracing::Instrument;
use uuid::Uuid;
use vision_gateway::ModelGateway;

use crate::error::{ApiError, ApiResult};
use crate::multipart::read_form;

/// Shared, read-only request context
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: ModelGateway,
    pub max_images: usize,
}

impl AppState {
    pub fn new(gateway: ModelGateway, max_images: usize) -> Self {
        AppState {
            gateway,
            max_images,
        }
    }
}

pub async fn analyze_images(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let request_id = Uuid::new_v4().to_string();
    METRICS.inc_batches_received();

    async move {
        let started = Instant::now();
        let outcome = answer_batch(&state, multipart).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(Json(response)) => emit_batch_finished(response.results.len(), duration_ms),
            Err(err @ ApiError::Internal(_)) => {
                METRICS.inc_batches_failed();
                emit_batch_failed(duration_ms, err);
            }
            Err(err) => emit_batch_rejected(err.status().as_u16(), err),
        }
        outcome
    }
    .instrument(batch_span(&request_id))
    .await
}

async fn answer_batch(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let input = read_form(multipart).await?.validate(state.max_images)?;
    emit_batch_received(input.images.len(), input.question.len());

    let answers = state.gateway.ask(&input.question, &input.images).await?;
    Ok(Json(QueryResult::new(answers).into()))
}

/// Any method other than POST on the endpoint
pub async fn method_not_allowed() -> ApiError {
    emit_batch_rejected(405, &ApiError::MethodNotAllowed);
    ApiError::MethodNotAllowed
}
