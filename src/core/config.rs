/// Tunable limits for the sentiment engine.
///
/// Defaults mirror the original service: review text is bounded at 512
/// characters (the tokenizer truncation limit of the source deployment) and
/// the result cache holds on the order of a thousand distinct texts.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of distinct normalized texts kept in the LRU cache.
    pub cache_capacity: usize,
    /// Maximum review length in characters; longer input is rejected.
    pub max_review_chars: usize,
    /// Number of model invocations allowed in flight at once.
    pub workers: usize,
    /// Requests allowed to wait for a worker before being shed.
    pub queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1024,
            max_review_chars: 512,
            workers: 2,
            queue_depth: 32,
        }
    }
}
