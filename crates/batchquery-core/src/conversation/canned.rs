//! Network-free answers for demos.

use async_trait::async_trait;

use super::submitter::{QuerySubmitter, SubmitError};
use crate::domain::{QueryRequest, QueryResult};

/// Answer used when no canned question matches.
pub const FALLBACK_ANSWER: &str = "Mock LLM response: Images analyzed successfully.";

const CANNED_ANSWERS: &[(&str, &str)] = &[
    (
        "Are there any visible defects or issues?",
        "No issues were detected",
    ),
    (
        "Are there any visible defects?",
        "No visible defects were found in the uploaded images.",
    ),
    (
        "What is the difference between these images?",
        "The images are nearly identical; only lighting and framing differ slightly.",
    ),
    (
        "Describe the image.",
        "The image shows a product photographed on a plain, light background.",
    ),
];

/// Looks up answers by case-insensitive exact match on the trimmed question.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    table: Vec<(String, String)>,
    fallback: String,
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self {
            table: CANNED_ANSWERS
                .iter()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
            fallback: FALLBACK_ANSWER.to_string(),
        }
    }
}

impl CannedResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override one canned answer.
    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        self.table.retain(|(q, _)| !q.eq_ignore_ascii_case(&question));
        self.table.push((question, answer.into()));
        self
    }

    pub fn answer_for(&self, question: &str) -> &str {
        let question = question.trim();
        self.table
            .iter()
            .find(|(q, _)| q.to_lowercase() == question.to_lowercase())
            .map(|(_, a)| a.as_str())
            .unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl QuerySubmitter for CannedResponder {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, SubmitError> {
        Ok(QueryResult::new(vec![self
            .answer_for(request.question())
            .to_string()]))
    }
}
