//! Sentiment-inference engine for movie reviews.
//!
//! This module orchestrates the full request path: input validation, the
//! normalized-text LRU cache, bounded-concurrency model invocation, and
//! per-movie aggregation.
//!
//! ## Main Types
//!
//! - [`SentimentEngine`] - classify reviews and read per-movie summaries
//! - [`SentimentEngineBuilder`] - builder for device and capacity knobs
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cinesense::pipelines::sentiment::*;
//!
//! # tokio_test::block_on(async {
//! let engine = SentimentEngineBuilder::modernbert(ModernBertSize::Base)
//!     .cpu()
//!     .cache_capacity(512)
//!     .build()
//!     .await?;
//!
//! let review = engine.classify_review("정말 좋았어요", 42).await?;
//! println!("{} ({:.2})", review.label, review.score);
//!
//! let summary = engine.summary(42).await?;
//! println!("mean score: {:.3}", summary.mean_score);
//! # cinesense::Result::Ok(())
//! # });
//! ```

pub mod builder;
pub mod engine;

pub use builder::SentimentEngineBuilder;
pub use engine::SentimentEngine;

pub use crate::models::ModernBertSize;
