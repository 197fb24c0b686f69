//! Extraction plumbing shared by every adapter: document payloads, response cleaning
//! and validation, and the sequential batch runner.

pub mod batch;
pub mod payload;
pub mod response;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Why a single extraction or optimization unit failed. The unit is abandoned whole.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("completion service error: {0}")]
    Gateway(#[from] LlmError),

    #[error("response was not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response did not match the expected shape: {0}")]
    Shape(String),
}

impl ExtractionError {
    pub fn shape(message: impl Into<String>) -> Self {
        ExtractionError::Shape(message.into())
    }
}
