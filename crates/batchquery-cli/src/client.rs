//! HTTP submitter: posts the batch as `multipart/form-data`.

use async_trait::async_trait;
use batchquery_core::{ErrorBody, QueryRequest, QueryResponse, QueryResult, QuerySubmitter, SubmitError};
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// Default endpoint of a local `batchqueryd`
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000/api/analyze-images";

#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpSubmitter {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("batchquery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpSubmitter {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn form(request: &QueryRequest) -> Result<Form, SubmitError> {
        let mut form = Form::new().text("question", request.question().to_string());
        for image in request.images() {
            let part = Part::bytes(image.bytes().to_vec())
                .file_name(image.name().to_string())
                .mime_str(image.mime_type())
                .map_err(|e| SubmitError::Transport(e.to_string()))?;
            form = form.part("images", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl QuerySubmitter for HttpSubmitter {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, SubmitError> {
        debug!(url = %self.url, images = request.images().len(), "posting batch");

        let response = self
            .client
            .post(&self.url)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("server returned {status}"));
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;
        Ok(parsed.into())
    }
}
