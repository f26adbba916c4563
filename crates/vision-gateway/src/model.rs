//! The per-image answering capability.

use async_trait::async_trait;
use batchquery_core::ImageHandle;

use crate::Result;

/// Answers one question about one image.
///
/// Implementations must be independent per call: the gateway runs one call
/// per image concurrently and makes exactly one attempt each.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn answer(&self, question: &str, image: &ImageHandle) -> Result<String>;
}
