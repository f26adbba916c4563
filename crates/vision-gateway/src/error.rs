//! Error types for vision-gateway

use thiserror::Error;

/// Errors that can occur while asking the vision model
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Live mode without a usable configuration (e.g. no API key).
    /// Fatal to the call, never retried.
    #[error("{0}")]
    Configuration(String),

    /// The model answered with a non-success status
    #[error("{0}")]
    Upstream(String),

    /// The request never completed
    #[error("OpenAI API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model answered with a body we could not read
    #[error("Unexpected OpenAI API response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    pub fn missing_api_key() -> Self {
        GatewayError::Configuration("Missing OpenAI API key.".to_string())
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message() {
        assert_eq!(
            GatewayError::missing_api_key().to_string(),
            "Missing OpenAI API key."
        );
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = GatewayError::Upstream("OpenAI API error: rate limited".to_string());
        assert_eq!(err.to_string(), "OpenAI API error: rate limited");
    }
}
