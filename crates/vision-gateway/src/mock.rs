//! Deterministic, network-free model.

use async_trait::async_trait;
use batchquery_core::ImageHandle;

use crate::model::VisionModel;
use crate::Result;

/// Answer returned for every image in mock mode.
pub const MOCK_ANSWER: &str = "Mock LLM response: Image analyzed successfully.";

/// Returns [`MOCK_ANSWER`] regardless of question or image content.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockVisionModel;

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn answer(&self, _question: &str, _image: &ImageHandle) -> Result<String> {
        Ok(MOCK_ANSWER.to_string())
    }
}
