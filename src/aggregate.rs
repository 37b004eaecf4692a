//! Per-movie sentiment aggregation.
//!
//! Each movie carries one running [`SentimentSummary`]: per-label counts and
//! the incremental mean of review scores. Incremental updates and full
//! recomputation are separate entry points sharing one invariant — for any
//! set of reviews, in any order, they agree within floating-point tolerance.
//! Incremental *decrement* is deliberately not offered; after deletions the
//! collaborator recomputes from the surviving reviews.

use crate::core::{MovieId, Review, Sentiment};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Review counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl LabelCounts {
    pub fn get(&self, label: Sentiment) -> u64 {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    fn bump(&mut self, label: Sentiment) {
        match label {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// Running sentiment statistics for one movie.
///
/// `sample_size` always equals the number of reviews folded in; `mean_score`
/// is their arithmetic mean (0.0 while empty).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentSummary {
    pub counts: LabelCounts,
    pub mean_score: f64,
    pub sample_size: u64,
}

impl SentimentSummary {
    /// Fold one review in, using the incremental-mean update.
    pub fn record(&mut self, label: Sentiment, score: f64) {
        self.counts.bump(label);
        self.sample_size += 1;
        self.mean_score += (score - self.mean_score) / self.sample_size as f64;
    }
}

/// Ground-truth recomputation over a full review set.
pub fn recompute_from<'a, I>(reviews: I) -> SentimentSummary
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut summary = SentimentSummary::default();
    for review in reviews {
        summary.record(review.label, review.score as f64);
    }
    summary
}

/// Owns every per-movie summary.
///
/// The outer map is read-mostly; each summary sits behind its own lock so
/// updates to different movies proceed in parallel while updates to the same
/// movie are serialized, which the incremental mean requires.
pub struct AggregationEngine {
    movies: RwLock<HashMap<MovieId, Arc<Mutex<SentimentSummary>>>>,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self {
            movies: RwLock::new(HashMap::new()),
        }
    }

    /// Fold a classified review into its movie's summary, creating the
    /// summary on first sight of the movie. Returns the updated summary.
    pub async fn record_review(&self, review: &Review) -> SentimentSummary {
        let slot = self.slot(review.movie_id).await;
        let mut summary = slot.lock().await;
        summary.record(review.label, review.score as f64);
        summary.clone()
    }

    pub async fn get(&self, movie_id: MovieId) -> Option<SentimentSummary> {
        let movies = self.movies.read().await;
        match movies.get(&movie_id) {
            Some(slot) => Some(slot.lock().await.clone()),
            None => None,
        }
    }

    /// Drop a movie's summary. Returns whether one existed.
    pub async fn remove(&self, movie_id: MovieId) -> bool {
        self.movies.write().await.remove(&movie_id).is_some()
    }

    /// Replace a movie's summary wholesale (the recompute path).
    pub async fn replace(&self, movie_id: MovieId, summary: SentimentSummary) -> SentimentSummary {
        let mut movies = self.movies.write().await;
        movies.insert(movie_id, Arc::new(Mutex::new(summary.clone())));
        summary
    }

    async fn slot(&self, movie_id: MovieId) -> Arc<Mutex<SentimentSummary>> {
        {
            let movies = self.movies.read().await;
            if let Some(slot) = movies.get(&movie_id) {
                return slot.clone();
            }
        }
        let mut movies = self.movies.write().await;
        movies.entry(movie_id).or_default().clone()
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Prediction;

    const TOLERANCE: f64 = 1e-9;

    fn review(movie_id: MovieId, label: Sentiment, score: f32) -> Review {
        Review::from_prediction(movie_id, None, "text", Prediction::new(label, score))
    }

    #[test]
    fn incremental_matches_recompute() {
        let reviews: Vec<Review> = (0..100)
            .map(|i| {
                let label = Sentiment::ALL[i % 3];
                review(7, label, (i as f32) / 100.0)
            })
            .collect();

        let mut incremental = SentimentSummary::default();
        for r in &reviews {
            incremental.record(r.label, r.score as f64);
        }
        let recomputed = recompute_from(&reviews);

        assert_eq!(incremental.counts, recomputed.counts);
        assert_eq!(incremental.sample_size, recomputed.sample_size);
        assert!((incremental.mean_score - recomputed.mean_score).abs() < TOLERANCE);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let mut reviews: Vec<Review> = (0..50)
            .map(|i| review(7, Sentiment::ALL[i % 3], (i as f32) / 50.0))
            .collect();
        let forward = recompute_from(&reviews);
        reviews.reverse();
        let backward = recompute_from(&reviews);

        assert_eq!(forward.counts, backward.counts);
        assert!((forward.mean_score - backward.mean_score).abs() < TOLERANCE);
    }

    #[test]
    fn empty_summary_has_zero_mean() {
        let no_reviews: Vec<Review> = Vec::new();
        let summary = recompute_from(&no_reviews);
        assert_eq!(summary.sample_size, 0);
        assert_eq!(summary.mean_score, 0.0);
    }

    #[tokio::test]
    async fn summaries_are_per_movie() {
        let engine = AggregationEngine::new();
        engine
            .record_review(&review(1, Sentiment::Positive, 0.9))
            .await;
        engine
            .record_review(&review(2, Sentiment::Negative, 0.8))
            .await;

        let one = engine.get(1).await.unwrap();
        let two = engine.get(2).await.unwrap();
        assert_eq!(one.counts.positive, 1);
        assert_eq!(one.sample_size, 1);
        assert_eq!(two.counts.negative, 1);
        assert!(engine.get(3).await.is_none());
    }

    #[tokio::test]
    async fn remove_and_replace() {
        let engine = AggregationEngine::new();
        engine
            .record_review(&review(5, Sentiment::Neutral, 0.5))
            .await;
        assert!(engine.remove(5).await);
        assert!(!engine.remove(5).await);
        assert!(engine.get(5).await.is_none());

        let rebuilt = recompute_from(&[review(5, Sentiment::Positive, 1.0)]);
        engine.replace(5, rebuilt).await;
        assert_eq!(engine.get(5).await.unwrap().sample_size, 1);
    }
}
