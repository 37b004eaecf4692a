//! ModernBERT sequence-classification wrapper.
//!
//! Wraps candle's ModernBERT implementation behind the [`SentimentModel`]
//! trait: tokenize, forward, argmax, and map the predicted class id onto the
//! closed [`Sentiment`] set resolved from the repo's `id2label` at load time.

use crate::core::{Prediction, Result, Sentiment, SentimentError};
use crate::loaders::{ClassifierWeightsLoader, TokenizerLoader};
use crate::models::quantization::{self, WeightPrecision};
use crate::models::SentimentModel;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config, ModernBertForSequenceClassification,
};
use serde::Deserialize;
use std::collections::HashMap;
use tokenizers::Tokenizer;
use tracing::info;

/// Available ModernBERT sentiment model sizes.
#[derive(Debug, Clone, Copy)]
pub enum ModernBertSize {
    /// Base model (~150M parameters).
    Base,
    /// Large model (~400M parameters).
    Large,
}

impl ModernBertSize {
    pub fn model_id(&self) -> &'static str {
        match self {
            ModernBertSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModernBertSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

pub struct SentimentModernBertModel {
    model: ModernBertForSequenceClassification,
    tokenizer: Tokenizer,
    device: Device,
    labels: HashMap<u32, Sentiment>,
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    id2label: HashMap<String, String>,
}

impl SentimentModernBertModel {
    pub async fn load(size: ModernBertSize, device: Device) -> Result<Self> {
        Self::load_from(size.model_id(), device).await
    }

    /// Load a classifier from an arbitrary Hub repo. The repo's `id2label`
    /// must map onto the closed [`Sentiment`] set.
    pub async fn load_from(model_id: &str, device: Device) -> Result<Self> {
        let tokenizer = TokenizerLoader::new(model_id, "tokenizer.json")
            .load()
            .await?;
        let (config_path, weights_path) = ClassifierWeightsLoader::new(model_id).load().await?;

        let config_content = std::fs::read_to_string(&config_path)?;

        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_content)?;
        let labels = resolve_labels(&class_cfg.id2label)?;

        let mut config: Config = serde_json::from_str(&config_content)?;
        // Inject classification metadata so the head builds with the correct
        // class count even when the checkpoint config omits it.
        let label2id = class_cfg
            .id2label
            .iter()
            .map(|(id, label)| (label.clone(), id.clone()))
            .collect();
        let pooling = config
            .classifier_config
            .as_ref()
            .map(|c| c.classifier_pooling)
            .unwrap_or(ClassifierPooling::MEAN);
        config.classifier_config = Some(ClassifierConfig {
            id2label: class_cfg.id2label,
            label2id,
            classifier_pooling: pooling,
        });

        let precision = WeightPrecision::for_device(&device);
        let vb = quantization::load_weights(&weights_path, precision, &device)?;
        let model = ModernBertForSequenceClassification::load(vb, &config)
            .map_err(|e| SentimentError::ModelLoad(format!("{model_id}: {e}")))?;

        info!(model = model_id, precision = precision.as_str(), "sentiment model ready");

        Ok(Self {
            model,
            tokenizer,
            device,
            labels,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        let tokens = self.tokenizer.encode(text, true).map_err(|e| {
            let preview: String = text.chars().take(50).collect();
            SentimentError::Tokenization(format!("failed on '{preview}': {e}"))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask)?
            .to_dtype(DType::F32)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs_vec.get(pred_id as usize).copied().ok_or_else(|| {
            SentimentError::Inference(format!("class id {pred_id} out of range"))
        })?;

        let label = self.labels.get(&pred_id).copied().ok_or_else(|| {
            SentimentError::Inference(format!("predicted class id {pred_id} has no label"))
        })?;

        Ok(Prediction::new(label, score))
    }
}

impl SentimentModel for SentimentModernBertModel {
    fn classify(&self, text: &str) -> Result<Prediction> {
        self.predict(text)
    }
}

fn resolve_labels(id2label: &HashMap<String, String>) -> Result<HashMap<u32, Sentiment>> {
    let mut labels = HashMap::with_capacity(id2label.len());
    for (id, label) in id2label {
        let id: u32 = id.parse().map_err(|_| {
            SentimentError::ModelLoad(format!("non-numeric class id '{id}' in id2label"))
        })?;
        let sentiment = Sentiment::parse(label).ok_or_else(|| {
            SentimentError::ModelLoad(format!(
                "label '{label}' is not one of positive/neutral/negative"
            ))
        })?;
        labels.insert(id, sentiment);
    }
    if labels.is_empty() {
        return Err(SentimentError::ModelLoad("empty id2label map".to_string()));
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_label_sets() {
        let raw: HashMap<String, String> = [
            ("0".to_string(), "positive".to_string()),
            ("1".to_string(), "neutral".to_string()),
            ("2".to_string(), "NEGATIVE".to_string()),
        ]
        .into();
        let labels = resolve_labels(&raw).unwrap();
        assert_eq!(labels[&0], Sentiment::Positive);
        assert_eq!(labels[&2], Sentiment::Negative);
    }

    #[test]
    fn rejects_unknown_labels() {
        let raw: HashMap<String, String> =
            [("0".to_string(), "LABEL_0".to_string())].into();
        assert!(resolve_labels(&raw).is_err());
    }
}
