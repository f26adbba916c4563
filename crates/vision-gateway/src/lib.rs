//! Vision Gateway for BatchQuery
//!
//! Answers one question about each image of a batch, either with a fixed
//! mock answer or by calling an OpenAI-compatible vision model.
//!
//! ## Features
//!
//! - Mode chosen once at construction (`Mode::Mock` / `Mode::Live`)
//! - Concurrent per-image calls, answers re-assembled in input order
//! - One attempt per image; any failure fails the batch

pub mod config;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod model;
pub mod openai;

pub use config::{
    GatewayConfig, LiveConfig, Mode, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
pub use error::{GatewayError, Result};
pub use gateway::ModelGateway;
pub use mock::{MockVisionModel, MOCK_ANSWER};
pub use model::VisionModel;
pub use openai::{data_url, OpenAiVisionModel, EMPTY_ANSWER};
