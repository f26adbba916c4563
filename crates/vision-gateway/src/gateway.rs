//! Ordered concurrent dispatch of one question over many images

use std::sync::Arc;
use std::time::Instant;

use batchquery_core::{emit_image_answered, ImageHandle, METRICS};
use futures::future::try_join_all;
use tracing::{info, warn};

use crate::config::{GatewayConfig, Mode};
use crate::mock::MockVisionModel;
use crate::model::VisionModel;
use crate::openai::OpenAiVisionModel;
use crate::Result;

/// Asks a question about every image of a batch
///
/// Built once from a [`GatewayConfig`]; the mode never changes afterwards.
#[derive(Clone)]
pub struct ModelGateway {
    mode: Mode,
    model: Arc<dyn VisionModel>,
}

impl ModelGateway {
    /// Build the gateway for the configured mode
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let model: Arc<dyn VisionModel> = match config.mode {
            Mode::Mock => Arc::new(MockVisionModel),
            Mode::Live => {
                if !config.live.has_api_key() {
                    warn!("live mode without an API key; every live call will fail");
                }
                Arc::new(OpenAiVisionModel::new(config.live)?)
            }
        };
        info!(mode = %config.mode, "model gateway ready");
        Ok(Self::with_model(config.mode, model))
    }

    /// Wrap an arbitrary model (tests, alternative providers)
    pub fn with_model(mode: Mode, model: Arc<dyn VisionModel>) -> Self {
        ModelGateway { mode, model }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// One answer per image, in the order of `images`
    ///
    /// All calls run concurrently; completion order does not matter. The
    /// first failing call fails the whole batch and the remaining calls are
    /// dropped. No retries.
    pub async fn ask(&self, question: &str, images: &[ImageHandle]) -> Result<Vec<String>> {
        METRICS.add_images_dispatched(images.len() as u64);

        let calls = images.iter().enumerate().map(|(index, image)| {
            let model = Arc::clone(&self.model);
            async move {
                let started = Instant::now();
                let answer = model.answer(question, image).await?;
                emit_image_answered(index, started.elapsed().as_millis() as u64);
                Ok::<_, crate::GatewayError>(answer)
            }
        });

        try_join_all(calls).await
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
