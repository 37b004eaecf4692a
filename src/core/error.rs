use crate::core::types::MovieId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    // Client errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no sentiment summary for movie {0}")]
    NotFound(MovieId),

    // Startup / lifecycle
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("sentiment model is not initialized yet")]
    ModelUnavailable,

    // Capacity
    #[error("inference worker pool and queue are saturated")]
    Overloaded,

    // Inference
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    // Network/Download
    #[error("download failed: {0}")]
    Download(String),

    // Device
    #[error("device error: {0}")]
    Device(String),

    // Pass-through from dependencies
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SentimentError>;

impl From<hf_hub::api::tokio::ApiError> for SentimentError {
    fn from(value: hf_hub::api::tokio::ApiError) -> Self {
        SentimentError::Download(value.to_string())
    }
}

impl SentimentError {
    /// Whether a caller may reasonably retry the same request after backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SentimentError::ModelUnavailable | SentimentError::Overloaded
        )
    }
}
