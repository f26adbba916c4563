//! Domain models for BatchQuery.
//!
//! - `ImageHandle` / `AcceptedImageSet`: images attached to the next question
//! - `QueryRequest` / `QueryResult`: one dispatchable question and its answers
//! - `ConversationTurn`: transcript entries

pub mod error;
pub mod image;
pub mod query;
pub mod turn;

pub use error::{IntakeError, IntakeResult, QueryError};
pub use image::{AcceptedImageSet, ImageHandle, ImageMetadata, MediaType, MAX_IMAGES};
pub use query::{AnswerEntry, ErrorBody, QueryRequest, QueryResponse, QueryResult};
pub use turn::{ConversationTurn, Role, PENDING_PLACEHOLDER};
