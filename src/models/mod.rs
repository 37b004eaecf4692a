pub mod modernbert;
pub mod quantization;

pub use modernbert::{ModernBertSize, SentimentModernBertModel};
pub use quantization::WeightPrecision;

use crate::core::{Prediction, Result};

/// A loaded sentiment classifier.
///
/// Implementations own their tokenizer and any device state; `classify` is
/// pure given a loaded model and safe for concurrent callers (weights are
/// read-only after load).
pub trait SentimentModel: Send + Sync + 'static {
    fn classify(&self, text: &str) -> Result<Prediction>;
}
