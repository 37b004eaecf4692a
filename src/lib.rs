//! # cinesense
//!
//! Sentiment-inference core for a movie review service. Loads a pretrained
//! multilingual classifier once per process, reduces its weight precision
//! for the target device, serves concurrent classification requests through
//! a bounded worker pool with an LRU result cache, and keeps a running
//! per-movie sentiment summary that downstream CRUD/display layers read.

pub mod aggregate;
pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod utils;

// Re-export core types
pub use crate::core::{
    EngineConfig, MovieId, Prediction, Result, Review, Sentiment, SentimentError,
};

pub use aggregate::{AggregationEngine, LabelCounts, SentimentSummary};
pub use models::{ModernBertSize, SentimentModel, SentimentModernBertModel};
pub use pipelines::sentiment::{SentimentEngine, SentimentEngineBuilder};
