//! Conversation: the question/answer transcript and its submission lifecycle.
//!
//! A submission moves `Idle → Resolving → Idle`. While resolving, the
//! transcript ends with a placeholder assistant turn that is replaced in
//! place once the answer arrives. Only one submission may be in flight;
//! image changes are not blocked by it.
//!
//! # Modules
//!
//! - [`orchestrator`]: `Conversation`, `PendingQuery`
//! - [`submitter`]   : `QuerySubmitter` seam and `SubmitError`
//! - [`canned`]      : `CannedResponder` for demo wiring
//! - [`error`]       : `ConversationError`

pub mod canned;
pub mod error;
pub mod orchestrator;
pub mod submitter;

pub use canned::{CannedResponder, FALLBACK_ANSWER};
pub use error::ConversationError;
pub use orchestrator::{Conversation, PendingQuery, Phase};
pub use submitter::{QuerySubmitter, SubmitError};
