use crate::core::error::{Result, SentimentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movie identifier, assigned by the collaborating CRUD layer.
pub type MovieId = i64;

/// Closed set of sentiment labels.
///
/// The classifier's `id2label` map is resolved onto this enum once at load
/// time so model output and aggregation keys cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Parse a model-reported label string, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classification outcome: the argmax label and its softmax
/// probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Sentiment,
    pub score: f32,
}

impl Prediction {
    pub fn new(label: Sentiment, score: f32) -> Self {
        Self { label, score }
    }
}

/// A classified review. Immutable once produced; re-classification creates a
/// new record.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub movie_id: MovieId,
    pub author: Option<String>,
    pub text: String,
    pub label: Sentiment,
    pub score: f32,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Build a review from a prediction, stamped with the current time.
    /// Scores are stored rounded to four decimal places.
    pub fn from_prediction(
        movie_id: MovieId,
        author: Option<String>,
        text: &str,
        prediction: Prediction,
    ) -> Self {
        Self {
            movie_id,
            author,
            text: text.to_string(),
            label: prediction.label,
            score: round4(prediction.score),
            created_at: Utc::now(),
        }
    }
}

pub(crate) fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

/// Validate review text against the configured bounds.
pub(crate) fn validate_text(text: &str, max_chars: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(SentimentError::InvalidInput(
            "review text is empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(SentimentError::InvalidInput(format!(
            "review text is {chars} characters, limit is {max_chars}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_labels() {
        assert_eq!(Sentiment::parse("POSITIVE"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse(" neutral "), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("label_3"), None);
    }

    #[test]
    fn scores_round_to_four_places() {
        let review = Review::from_prediction(
            1,
            None,
            "fine",
            Prediction::new(Sentiment::Positive, 0.123_456_78),
        );
        assert_eq!(review.score, 0.1235);
    }

    #[test]
    fn rejects_empty_and_oversized_text() {
        assert!(validate_text("   ", 512).is_err());
        assert!(validate_text(&"a".repeat(513), 512).is_err());
        assert!(validate_text("정말 좋았어요", 512).is_ok());
    }
}
