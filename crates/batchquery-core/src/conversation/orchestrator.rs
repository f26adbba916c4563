//! Transcript owner and submission state machine.

use tracing::{instrument, warn};

use super::error::ConversationError;
use super::submitter::{QuerySubmitter, SubmitError};
use crate::domain::{AcceptedImageSet, ConversationTurn, QueryRequest, QueryResult};
use crate::notice::TransientNotice;
use crate::obs::{emit_conversation_resolved, emit_conversation_submitted};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
}

/// Ticket for the submission currently in flight.
///
/// Produced by [`Conversation::begin`] and handed back to
/// [`Conversation::resolve`]. It owns a snapshot of the images, so the
/// caller may keep changing its image set meanwhile.
#[derive(Debug)]
pub struct PendingQuery {
    request: QueryRequest,
    placeholder: usize,
    seq: u64,
}

impl PendingQuery {
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

/// Append-only transcript plus the single in-flight submission.
#[derive(Debug, Default)]
pub struct Conversation {
    transcript: Vec<ConversationTurn>,
    in_flight: Option<u64>,
    next_seq: u64,
    notice: TransientNotice,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notice(notice: TransientNotice) -> Self {
        Self {
            notice,
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Resolving
        } else {
            Phase::Idle
        }
    }

    pub fn current_error(&self) -> Option<&str> {
        self.notice.current()
    }

    /// Leave `Idle`: validate, append the user turn and the placeholder.
    ///
    /// A second call while a submission is resolving is rejected with
    /// [`ConversationError::SubmissionInFlight`] and changes nothing.
    /// Validation failures raise the transient notice and never reach the
    /// submitter.
    pub fn begin(
        &mut self,
        question: &str,
        images: &AcceptedImageSet,
    ) -> Result<PendingQuery, ConversationError> {
        if self.in_flight.is_some() {
            return Err(ConversationError::SubmissionInFlight);
        }

        let request = match QueryRequest::new(question, images.clone()) {
            Ok(request) => request,
            Err(e) => {
                self.notice.raise(e.to_string());
                return Err(e.into());
            }
        };

        self.transcript
            .push(ConversationTurn::user(request.question()));
        self.transcript.push(ConversationTurn::pending());

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);

        emit_conversation_submitted(seq, request.images().len());

        Ok(PendingQuery {
            placeholder: self.transcript.len() - 1,
            request,
            seq,
        })
    }

    /// Settle the in-flight submission and return to `Idle`.
    ///
    /// On success the placeholder is replaced in place by the answer. On
    /// failure the placeholder is dropped, the error becomes the transient
    /// notice and is returned; nothing about it enters the transcript.
    pub fn resolve(
        &mut self,
        pending: PendingQuery,
        outcome: Result<QueryResult, SubmitError>,
    ) -> Result<(), ConversationError> {
        if self.in_flight != Some(pending.seq) {
            warn!(seq = pending.seq, "ignoring stale submission outcome");
            return Ok(());
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.transcript[pending.placeholder] =
                    ConversationTurn::assistant(result.to_transcript_text());
                emit_conversation_resolved(pending.seq, true);
                Ok(())
            }
            Err(e) => {
                self.transcript.remove(pending.placeholder);
                self.notice.raise(e.to_string());
                emit_conversation_resolved(pending.seq, false);
                Err(e.into())
            }
        }
    }

    /// `begin`, await the submitter, then `resolve`.
    #[instrument(skip_all)]
    pub async fn submit<S>(
        &mut self,
        submitter: &S,
        question: &str,
        images: &AcceptedImageSet,
    ) -> Result<(), ConversationError>
    where
        S: QuerySubmitter + ?Sized,
    {
        let pending = self.begin(question, images)?;
        let outcome = submitter.submit(pending.request()).await;
        self.resolve(pending, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::CannedResponder;
    use crate::domain::{ImageHandle, Role, PENDING_PLACEHOLDER};
    use crate::intake::try_add;

    fn images(n: usize) -> AcceptedImageSet {
        let handles = (0..n)
            .map(|i| ImageHandle::from_bytes(format!("{i}.jpg"), "image/jpeg", i as i64, vec![1]));
        try_add(&AcceptedImageSet::new(), handles).0
    }

    #[test]
    fn test_begin_appends_user_and_placeholder() {
        let mut conv = Conversation::new();
        let pending = conv.begin("  Any dents?  ", &images(2)).unwrap();

        assert_eq!(conv.phase(), Phase::Resolving);
        assert_eq!(pending.request().question(), "Any dents?");
        assert_eq!(conv.transcript().len(), 2);
        assert_eq!(conv.transcript()[0], ConversationTurn::user("Any dents?"));
        assert_eq!(conv.transcript()[1].role, Role::Assistant);
        assert_eq!(conv.transcript()[1].text, PENDING_PLACEHOLDER);
    }

    #[test]
    fn test_second_begin_while_resolving_is_rejected() {
        let mut conv = Conversation::new();
        let first = conv.begin("first?", &images(1)).unwrap();

        let err = conv.begin("second?", &images(1)).unwrap_err();
        assert_eq!(err, ConversationError::SubmissionInFlight);
        assert_eq!(conv.transcript().len(), 2, "rejected submit must not append");

        conv.resolve(first, Ok(QueryResult::new(vec!["done".into()])))
            .unwrap();
        assert_eq!(conv.phase(), Phase::Idle);
        assert!(conv.begin("second?", &images(1)).is_ok());
    }

    #[test]
    fn test_resolve_replaces_placeholder_in_place() {
        let mut conv = Conversation::new();
        let pending = conv.begin("q", &images(1)).unwrap();
        conv.resolve(pending, Ok(QueryResult::new(vec!["answer".into()])))
            .unwrap();

        assert_eq!(
            conv.transcript(),
            &[ConversationTurn::user("q"), ConversationTurn::assistant("answer")]
        );
    }

    #[test]
    fn test_failed_resolution_drops_placeholder_and_raises_notice() {
        let mut conv = Conversation::new();
        let pending = conv.begin("q", &images(1)).unwrap();
        let err = conv
            .resolve(
                pending,
                Err(SubmitError::Rejected {
                    status: 500,
                    message: "Missing OpenAI API key.".into(),
                }),
            )
            .unwrap_err();

        assert!(matches!(err, ConversationError::Submit(_)));
        assert_eq!(conv.transcript(), &[ConversationTurn::user("q")]);
        assert_eq!(conv.current_error(), Some("Missing OpenAI API key."));
        assert_eq!(conv.phase(), Phase::Idle);
    }

    #[test]
    fn test_validation_errors_never_append() {
        let mut conv = Conversation::new();
        assert!(conv.begin("   ", &images(1)).is_err());
        assert!(conv.begin("q", &images(0)).is_err());
        assert!(conv.transcript().is_empty());
        assert_eq!(conv.current_error(), Some("Please add at least one image."));
        assert_eq!(conv.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_submit_with_canned_responder() {
        let mut conv = Conversation::new();
        conv.submit(
            &CannedResponder::new(),
            "are there any visible defects or issues?",
            &images(3),
        )
        .await
        .unwrap();

        assert_eq!(conv.transcript().len(), 2);
        assert_eq!(conv.transcript()[1].text, "No issues were detected");
    }
}
