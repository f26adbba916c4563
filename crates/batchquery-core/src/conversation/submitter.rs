//! The seam between the conversation and whatever answers questions.

use async_trait::async_trait;

use crate::domain::{QueryRequest, QueryResult};

/// Failures of one submission as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status and this message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

/// Answers one dispatchable query.
///
/// Implementations: an HTTP client talking to the batch endpoint, and
/// [`CannedResponder`](super::CannedResponder) for demos.
#[async_trait]
pub trait QuerySubmitter: Send + Sync {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, SubmitError>;
}
