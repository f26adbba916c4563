//! Intake and conversation working together the way a client drives them.

use std::time::Duration;

use async_trait::async_trait;
use batchquery_core::{
    CannedResponder, Conversation, ConversationError, ImageHandle, ImageIntake, Phase,
    PreviewProvider, QueryRequest, QueryResult, QuerySubmitter, Role, SubmitError,
    FALLBACK_ANSWER, PENDING_PLACEHOLDER,
};

struct NamePreview;

impl PreviewProvider for NamePreview {
    type Preview = String;

    fn create(&self, image: &ImageHandle) -> String {
        format!("preview:{}", image.name())
    }

    fn release(&self, _preview: String) {}
}

/// Echoes how many images were submitted.
struct CountingSubmitter;

#[async_trait]
impl QuerySubmitter for CountingSubmitter {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, SubmitError> {
        Ok(QueryResult::new(
            request
                .images()
                .iter()
                .map(|i| format!("saw {}", i.name()))
                .collect(),
        ))
    }
}

fn jpeg(name: &str) -> ImageHandle {
    ImageHandle::from_bytes(name, "image/jpeg", 1_000, name.as_bytes().to_vec())
}

#[tokio::test]
async fn test_images_may_change_while_question_resolves() {
    let mut intake = ImageIntake::new(NamePreview);
    let mut conversation = Conversation::new();

    intake.add(vec![jpeg("front.jpg"), jpeg("back.jpg")]);
    let pending = conversation
        .begin("What changed?", intake.images())
        .unwrap();

    // Still allowed while resolving.
    intake.remove_at(0);
    intake.add(vec![jpeg("side.jpg")]);
    assert_eq!(intake.previews(), &["preview:back.jpg", "preview:side.jpg"]);

    let outcome = CountingSubmitter.submit(pending.request()).await;
    conversation.resolve(pending, outcome).unwrap();

    let answer = &conversation.transcript()[1];
    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.text, "Image 1: saw front.jpg\nImage 2: saw back.jpg");
}

#[tokio::test]
async fn test_turns_stay_ordered_across_submissions() {
    let mut intake = ImageIntake::new(NamePreview);
    let mut conversation = Conversation::new();
    intake.add(vec![jpeg("a.jpg")]);

    let canned = CannedResponder::new();
    for question in ["Describe the image.", "anything else?"] {
        conversation
            .submit(&canned, question, intake.images())
            .await
            .unwrap();
    }

    let texts: Vec<_> = conversation
        .transcript()
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0], "Describe the image.");
    assert_ne!(texts[1], PENDING_PLACEHOLDER);
    assert_eq!(texts[2], "anything else?");
    assert_eq!(texts[3], FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_in_flight_submission_locks_out_next_question() {
    let mut intake = ImageIntake::new(NamePreview);
    let mut conversation = Conversation::new();
    intake.add(vec![jpeg("a.jpg")]);

    let pending = conversation.begin("first", intake.images()).unwrap();
    let err = conversation
        .submit(&CannedResponder::new(), "second", intake.images())
        .await
        .unwrap_err();
    assert_eq!(err, ConversationError::SubmissionInFlight);
    assert_eq!(conversation.phase(), Phase::Resolving);

    conversation
        .resolve(pending, Ok(QueryResult::new(vec!["ok".into()])))
        .unwrap();
    assert_eq!(conversation.transcript().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_errors_clear_after_ten_seconds() {
    let mut intake = ImageIntake::new(NamePreview);
    let mut conversation = Conversation::new();

    for i in 0..5 {
        intake.add(vec![jpeg(&format!("{i}.jpg"))]);
    }
    assert!(intake.current_error().is_some());
    assert!(conversation.begin("", intake.images()).is_err());
    assert!(conversation.current_error().is_some());

    tokio::time::advance(Duration::from_millis(9_999)).await;
    assert!(intake.current_error().is_some());
    assert!(conversation.current_error().is_some());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(intake.current_error().is_none());
    assert!(conversation.current_error().is_none());
}
