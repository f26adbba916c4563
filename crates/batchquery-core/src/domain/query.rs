//! Dispatchable queries, their results and the JSON wire bodies.

use serde::{Deserialize, Serialize};

use super::error::QueryError;
use super::image::{AcceptedImageSet, MAX_IMAGES};

/// A question plus 1..=4 images, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    question: String,
    images: AcceptedImageSet,
}

impl QueryRequest {
    /// Trims `question` and checks the image count.
    pub fn new(question: &str, images: AcceptedImageSet) -> Result<Self, QueryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }
        if images.is_empty() {
            return Err(QueryError::NoImages);
        }
        if images.len() > MAX_IMAGES {
            return Err(QueryError::TooManyImages { max: MAX_IMAGES });
        }
        Ok(Self {
            question: question.to_string(),
            images,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn images(&self) -> &AcceptedImageSet {
        &self.images
    }
}

/// Per-image answers, same length and order as the request's images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    answers: Vec<String>,
}

impl QueryResult {
    pub fn new(answers: Vec<String>) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Collapse the answers into one transcript entry.
    ///
    /// A single answer is returned verbatim; several become `Image N: ...`
    /// lines in input order.
    pub fn to_transcript_text(&self) -> String {
        match self.answers.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            many => many
                .iter()
                .enumerate()
                .map(|(i, answer)| format!("Image {}: {}", i + 1, answer))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<QueryResponse> for QueryResult {
    fn from(body: QueryResponse) -> Self {
        Self::new(body.results.into_iter().map(|e| e.response).collect())
    }
}

/// One element of the success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub response: String,
}

/// `200 {"results":[{"response": ...}, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<AnswerEntry>,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            results: result
                .answers
                .into_iter()
                .map(|response| AnswerEntry { response })
                .collect(),
        }
    }
}

/// `4xx/5xx {"error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ImageHandle;
    use crate::intake::try_add;

    fn one_image() -> AcceptedImageSet {
        let image = ImageHandle::from_bytes("a.jpg", "image/jpeg", 1, vec![1, 2, 3]);
        let (set, err) = try_add(&AcceptedImageSet::new(), vec![image]);
        assert!(err.is_none());
        set
    }

    #[test]
    fn test_query_request_trims_question() {
        let req = QueryRequest::new("  Any scratches?  ", one_image()).unwrap();
        assert_eq!(req.question(), "Any scratches?");
        assert_eq!(req.images().len(), 1);
    }

    #[test]
    fn test_query_request_rejects_blank_question() {
        let err = QueryRequest::new("   ", one_image()).unwrap_err();
        assert_eq!(err, QueryError::EmptyQuestion);
    }

    #[test]
    fn test_query_request_rejects_empty_images() {
        let err = QueryRequest::new("What is this?", AcceptedImageSet::new()).unwrap_err();
        assert_eq!(err, QueryError::NoImages);
    }

    #[test]
    fn test_transcript_text_single_answer_verbatim() {
        let result = QueryResult::new(vec!["No issues were detected".to_string()]);
        assert_eq!(result.to_transcript_text(), "No issues were detected");
    }

    #[test]
    fn test_transcript_text_numbers_multiple_answers() {
        let result = QueryResult::new(vec!["A dent".to_string(), "Clean".to_string()]);
        assert_eq!(result.to_transcript_text(), "Image 1: A dent\nImage 2: Clean");
    }

    #[test]
    fn test_query_response_wire_shape() {
        let body = QueryResponse::from(QueryResult::new(vec!["ok".to_string()]));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"results": [{"response": "ok"}]}));

        let err = serde_json::to_value(ErrorBody::new("Method not allowed")).unwrap();
        assert_eq!(err, serde_json::json!({"error": "Method not allowed"}));
    }
}
