//! OpenAI-compatible chat-completions vision model
//!
//! Each call sends one user message made of the question and the image as
//! a base64 `data:` URL, and returns the first choice's text.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use batchquery_core::{ImageHandle, MediaType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LiveConfig;
use crate::error::GatewayError;
use crate::model::VisionModel;
use crate::Result;

/// Answer used when the model returns no text.
pub const EMPTY_ANSWER: &str = "No response.";

/// Live model backed by an HTTP chat-completions endpoint
pub struct OpenAiVisionModel {
    http_client: reqwest::Client,
    config: LiveConfig,
}

impl OpenAiVisionModel {
    /// Create a new live model
    ///
    /// A missing API key is not an error here; it fails each call instead.
    pub fn new(config: LiveConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("batchquery-vision-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(OpenAiVisionModel {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionModel {
    async fn answer(&self, question: &str, image: &ImageHandle) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(GatewayError::missing_api_key)?;

        let body = ChatCompletionRequest::for_image(
            &self.config.model,
            question,
            image,
            self.config.max_tokens,
        );

        debug!(
            model = %self.config.model,
            image = %image.name(),
            bytes = image.bytes().len(),
            "sending vision request"
        );

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream(format!(
                "OpenAI API error: {body_text}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Ok(parsed.into_text())
    }
}

/// Build `data:<mime>;base64,<payload>`. Types outside the accepted set are
/// sent as JPEG.
pub fn data_url(image: &ImageHandle) -> String {
    let mime = image.media_type().unwrap_or(MediaType::Jpeg).mime();
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(image.bytes()))
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

impl ChatCompletionRequest {
    pub(crate) fn for_image(
        model: &str,
        question: &str,
        image: &ImageHandle,
        max_tokens: u32,
    ) -> Self {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    MessageContent::Text {
                        text: question.to_string(),
                    },
                    MessageContent::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url(image),
                        },
                    },
                ],
            }],
            max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| EMPTY_ANSWER.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
