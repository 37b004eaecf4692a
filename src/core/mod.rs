pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use cache::{normalize, ReviewCache};
pub use config::EngineConfig;
pub use error::{Result, SentimentError};
pub use types::{MovieId, Prediction, Review, Sentiment};
