//! Reading the `question` + `images` multipart form.

use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use batchquery_core::{ImageHandle, IntakeError, QueryError};
use tracing::debug;

use crate::error::{ApiError, ApiResult, MISSING_FIELDS};

const QUESTION_FIELD: &str = "question";
const IMAGES_FIELD: &str = "images";

/// Raw form contents, before validation.
#[derive(Debug, Default)]
pub struct BatchForm {
    pub question: Option<String>,
    pub images: Vec<ImageHandle>,
}

/// A validated batch: non-empty question, 1..=max images of accepted types.
#[derive(Debug)]
pub struct BatchInput {
    pub question: String,
    pub images: Vec<ImageHandle>,
}

/// Drain the form. The first `question` value wins; fields other than
/// `question` and `images` are skipped.
pub async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<BatchForm> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut form = BatchForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            QUESTION_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if form.question.is_none() {
                    form.question = Some(text);
                }
            }
            IMAGES_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

                // Browsers send an empty, nameless part when no file is picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                let file_name = if file_name.is_empty() {
                    format!("image-{}", form.images.len() + 1)
                } else {
                    file_name
                };
                form.images
                    .push(ImageHandle::from_bytes(file_name, mime_type, 0, bytes.to_vec()));
            }
            other => {
                debug!(field = %other, "ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

impl BatchForm {
    /// Check presence, batch size and media types, in that order.
    pub fn validate(self, max_images: usize) -> ApiResult<BatchInput> {
        let question = self
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let question = match question {
            Some(q) if !self.images.is_empty() => q,
            _ => return Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
        };

        if self.images.len() > max_images {
            return Err(ApiError::BadRequest(
                QueryError::TooManyImages { max: max_images }.to_string(),
            ));
        }

        if let Some(bad) = self.images.iter().find(|i| i.media_type().is_none()) {
            return Err(ApiError::BadRequest(
                IntakeError::UnsupportedType {
                    mime_type: bad.mime_type().to_string(),
                }
                .to_string(),
            ));
        }

        Ok(BatchInput {
            question,
            images: self.images,
        })
    }
}
