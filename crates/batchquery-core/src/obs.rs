//! Structured observability hooks for batch and conversation lifecycles.
//!
//! Every event carries an `event = "<dotted.name>"` field so log pipelines
//! can filter on it. Batch events are emitted inside the span returned by
//! [`batch_span`].

use tracing::{info, warn, Span};

/// Span tagging everything logged while one batch request is handled.
///
/// Attach it with `tracing::Instrument` so it follows the request across
/// await points.
pub fn batch_span(request_id: &str) -> Span {
    tracing::info_span!("batchquery.batch", request_id = %request_id)
}

/// A batch request was parsed.
pub fn emit_batch_received(image_count: usize, question_len: usize) {
    info!(
        event = "batch.received",
        image_count = image_count,
        question_len = question_len,
    );
}

/// One per-image model call completed.
pub fn emit_image_answered(index: usize, elapsed_ms: u64) {
    info!(event = "batch.image_answered", index = index, elapsed_ms = elapsed_ms);
}

/// A batch finished with every image answered.
pub fn emit_batch_finished(image_count: usize, duration_ms: u64) {
    info!(
        event = "batch.finished",
        image_count = image_count,
        duration_ms = duration_ms,
    );
}

/// A batch was refused before any model call (bad request, wrong method).
pub fn emit_batch_rejected(status: u16, reason: &dyn std::fmt::Display) {
    warn!(event = "batch.rejected", status = status, reason = %reason);
}

/// A batch failed after dispatching (configuration or upstream error).
pub fn emit_batch_failed(duration_ms: u64, error: &dyn std::fmt::Display) {
    warn!(event = "batch.failed", duration_ms = duration_ms, error = %error);
}

/// A question left `Idle`.
pub fn emit_conversation_submitted(seq: u64, image_count: usize) {
    info!(event = "conversation.submitted", seq = seq, image_count = image_count);
}

/// A submission settled.
pub fn emit_conversation_resolved(seq: u64, success: bool) {
    info!(event = "conversation.resolved", seq = seq, success = success);
}
