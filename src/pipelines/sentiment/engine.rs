use crate::aggregate::{recompute_from, AggregationEngine, SentimentSummary};
use crate::core::cache::{normalize, ReviewCache};
use crate::core::types::validate_text;
use crate::core::{EngineConfig, MovieId, Result, Review, SentimentError};
use crate::models::SentimentModel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell, Semaphore, SemaphorePermit};
use tracing::{debug, info};

/// Admission control for model invocations: a fixed worker pool plus a
/// bounded wait queue. Requests beyond both are shed with `Overloaded`.
struct InferenceLimiter {
    permits: Semaphore,
    waiting: AtomicUsize,
    queue_depth: usize,
}

impl InferenceLimiter {
    fn new(workers: usize, queue_depth: usize) -> Self {
        Self {
            permits: Semaphore::new(workers.max(1)),
            waiting: AtomicUsize::new(0),
            queue_depth,
        }
    }

    async fn admit(&self) -> Result<SemaphorePermit<'_>> {
        if let Ok(permit) = self.permits.try_acquire() {
            return Ok(permit);
        }
        if self.waiting.fetch_add(1, Ordering::SeqCst) >= self.queue_depth {
            self.waiting.fetch_sub(1, Ordering::SeqCst);
            return Err(SentimentError::Overloaded);
        }
        let result = self.permits.acquire().await;
        self.waiting.fetch_sub(1, Ordering::SeqCst);
        // The semaphore is never closed.
        result.map_err(|_| SentimentError::Overloaded)
    }
}

/// The sentiment-inference core.
///
/// Owns the process-wide model handle, the LRU result cache, and the
/// per-movie aggregation state. Collaborating layers (HTTP/DB/UI) call
/// [`classify_review`](Self::classify_review) and
/// [`summary`](Self::summary), and notify deletions through
/// [`invalidate`](Self::invalidate) / [`recompute`](Self::recompute).
///
/// The model slot fills exactly once per process; until then every
/// classification fails with `ModelUnavailable` so callers can retry with
/// backoff while the (expensive) load completes.
pub struct SentimentEngine<M> {
    model: OnceCell<Arc<M>>,
    cache: Mutex<ReviewCache>,
    summaries: AggregationEngine,
    limiter: InferenceLimiter,
    config: EngineConfig,
}

impl<M: SentimentModel> SentimentEngine<M> {
    /// Create a cold engine; fill the model slot later with
    /// [`load_with`](Self::load_with).
    pub fn new(config: EngineConfig) -> Self {
        Self {
            model: OnceCell::new(),
            cache: Mutex::new(ReviewCache::new(config.cache_capacity)),
            summaries: AggregationEngine::new(),
            limiter: InferenceLimiter::new(config.workers, config.queue_depth),
            config,
        }
    }

    /// Create an engine around an already loaded model.
    pub fn with_model(config: EngineConfig, model: M) -> Self {
        let engine = Self::new(config);
        // A fresh cell cannot already be set.
        let _ = engine.model.set(Arc::new(model));
        engine
    }

    /// Fill the model slot, at most once per engine. Concurrent callers
    /// coalesce onto a single load; later calls are no-ops.
    pub async fn load_with<F, Fut>(&self, loader: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<M>>,
    {
        self.model
            .get_or_try_init(|| async { loader().await.map(Arc::new) })
            .await?;
        info!("sentiment engine warm");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.model.initialized()
    }

    /// Classify a review and fold it into its movie's summary.
    ///
    /// The returned review has already been aggregated: a caller never sees
    /// a review whose movie summary does not reflect it. A failed
    /// classification writes nothing, neither cache nor summary.
    pub async fn classify_review(&self, text: &str, movie_id: MovieId) -> Result<Review> {
        self.classify_inner(text, movie_id, None).await
    }

    /// Same as [`classify_review`](Self::classify_review), with the review
    /// author recorded.
    pub async fn classify_review_as(
        &self,
        author: &str,
        text: &str,
        movie_id: MovieId,
    ) -> Result<Review> {
        self.classify_inner(text, movie_id, Some(author.to_string()))
            .await
    }

    async fn classify_inner(
        &self,
        text: &str,
        movie_id: MovieId,
        author: Option<String>,
    ) -> Result<Review> {
        validate_text(text, self.config.max_review_chars)?;
        let model = self
            .model
            .get()
            .cloned()
            .ok_or(SentimentError::ModelUnavailable)?;

        let key = normalize(text);
        let cached = self.cache.lock().await.get(&key);
        let prediction = match cached {
            Some(prediction) => {
                debug!(movie_id, "cache hit");
                prediction
            }
            None => {
                let permit = self.limiter.admit().await?;
                // CPU-bound forward pass; keep it off the async executor
                // threads so timers and other tasks stay responsive.
                let task_model = model.clone();
                let task_text = text.trim().to_string();
                let prediction =
                    tokio::task::spawn_blocking(move || task_model.classify(&task_text))
                        .await
                        .map_err(|e| {
                            SentimentError::Inference(format!("inference task failed: {e}"))
                        })??;
                drop(permit);
                self.cache.lock().await.insert(key, prediction);
                prediction
            }
        };

        let review = Review::from_prediction(movie_id, author, text, prediction);
        self.summaries.record_review(&review).await;
        Ok(review)
    }

    /// Current summary for a movie.
    pub async fn summary(&self, movie_id: MovieId) -> Result<SentimentSummary> {
        self.summaries
            .get(movie_id)
            .await
            .ok_or(SentimentError::NotFound(movie_id))
    }

    /// Drop a movie's summary; called by the collaborator on movie deletion.
    ///
    /// Cache entries are keyed by text, not movie, and stay valid for
    /// identical text, so they are left in place.
    pub async fn invalidate(&self, movie_id: MovieId) -> bool {
        let removed = self.summaries.remove(movie_id).await;
        if removed {
            info!(movie_id, "summary invalidated");
        }
        removed
    }

    /// Rebuild a movie's summary from the full surviving review set and
    /// replace the stored one. The only mutation path after review
    /// deletion; incremental decrement is not offered.
    pub async fn recompute(&self, movie_id: MovieId, reviews: &[Review]) -> SentimentSummary {
        let summary = recompute_from(reviews.iter().filter(|r| r.movie_id == movie_id));
        self.summaries.replace(movie_id, summary).await
    }

    /// Number of distinct texts currently cached.
    pub async fn cached_texts(&self) -> usize {
        self.cache.lock().await.len()
    }
}
