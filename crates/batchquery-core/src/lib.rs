//! BatchQuery Core Library
//!
//! Client-side orchestration for batch image questions: image intake with
//! validation and de-duplication, the conversation transcript and its
//! submission lifecycle, plus the shared tracing and counter plumbing used
//! by the server and CLI.

pub mod conversation;
pub mod domain;
pub mod intake;
pub mod metrics;
pub mod notice;
pub mod obs;
pub mod telemetry;

pub use domain::{
    AcceptedImageSet, AnswerEntry, ConversationTurn, ErrorBody, ImageHandle, ImageMetadata,
    IntakeError, IntakeResult, MediaType, QueryError, QueryRequest, QueryResponse, QueryResult,
    Role, MAX_IMAGES, PENDING_PLACEHOLDER,
};

pub use conversation::{
    CannedResponder, Conversation, ConversationError, PendingQuery, Phase, QuerySubmitter,
    SubmitError, FALLBACK_ANSWER,
};
pub use intake::{remove_at, try_add, ImageIntake, PreviewProvider};
pub use notice::{TransientNotice, NOTICE_TTL};

pub use metrics::METRICS;
pub use obs::{
    batch_span, emit_batch_failed, emit_batch_finished, emit_batch_received, emit_batch_rejected,
    emit_conversation_resolved, emit_conversation_submitted, emit_image_answered,
};
pub use telemetry::init_tracing;

/// BatchQuery version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
