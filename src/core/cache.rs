//! Bounded LRU cache for classification results.
//!
//! Keys are *normalized* review texts, so cosmetic variation (case,
//! surrounding or repeated whitespace) never causes a second model
//! invocation. The cache is transparent: a cold cache changes latency only,
//! never classification outcomes. Reviews and summaries stay authoritative.

use crate::core::types::Prediction;
use std::collections::HashMap;

/// Normalize review text for cache keying: trim, collapse internal
/// whitespace to single spaces, casefold.
///
/// Applied identically on every lookup and insertion.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.to_lowercase()
}

struct Slot {
    prediction: Prediction,
    last_used: u64,
}

/// Least-recently-used cache of `normalized text -> prediction`.
///
/// Both hits and insertions refresh recency. Callers are expected to guard
/// the cache with a single lock; the critical sections are small.
pub struct ReviewCache {
    entries: HashMap<String, Slot>,
    capacity: usize,
    tick: u64,
}

impl ReviewCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Prediction> {
        self.tick += 1;
        let tick = self.tick;
        let slot = self.entries.get_mut(key)?;
        slot.last_used = tick;
        Some(slot.prediction)
    }

    pub fn insert(&mut self, key: String, prediction: Prediction) {
        self.tick += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            Slot {
                prediction,
                last_used: self.tick,
            },
        );
    }

    // Linear scan over recency stamps. Capacities are in the hundreds to low
    // thousands, so eviction cost stays negligible next to an inference.
    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Sentiment;

    fn pred(score: f32) -> Prediction {
        Prediction::new(Sentiment::Positive, score)
    }

    #[test]
    fn normalization_ignores_cosmetic_variation() {
        assert_eq!(normalize("  Great   Movie \n"), normalize("great movie"));
        assert_eq!(normalize("정말  좋았어요"), "정말 좋았어요");
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut cache = ReviewCache::new(3);
        for i in 0..10 {
            cache.insert(format!("text {i}"), pred(0.5));
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = ReviewCache::new(2);
        cache.insert("a".into(), pred(0.1));
        cache.insert("b".into(), pred(0.2));
        // Touch "a" so "b" becomes the LRU entry.
        assert!(cache.get("a").is_some());
        cache.insert("c".into(), pred(0.3));

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn reinserting_existing_key_does_not_evict() {
        let mut cache = ReviewCache::new(2);
        cache.insert("a".into(), pred(0.1));
        cache.insert("b".into(), pred(0.2));
        cache.insert("a".into(), pred(0.9));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").map(|p| p.score), Some(0.9));
        assert!(cache.get("b").is_some());
    }
}
