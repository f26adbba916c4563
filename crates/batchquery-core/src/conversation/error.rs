//! Error types for the conversation module.

use super::submitter::SubmitError;
use crate::domain::QueryError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("a question is already being analyzed")]
    SubmissionInFlight,

    #[error(transparent)]
    Submit(#[from] SubmitError),
}
