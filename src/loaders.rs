//! Model and tokenizer loading utilities for Hugging Face Hub integration.
//!
//! ## Main Types
//!
//! - [`HfLoader`] - Generic Hugging Face file loader with retry logic
//! - [`TokenizerLoader`] - Loads tokenizers from Hugging Face repositories
//! - [`ClassifierWeightsLoader`] - Resolves a classifier's config and weight
//!   files, preferring safetensors over pickled checkpoints
//!
//! All loaders include built-in retry logic to handle temporary network
//! issues and Hugging Face Hub lock acquisition failures.

use crate::core::error::{Result, SentimentError};
use std::path::PathBuf;
use tokenizers::Tokenizer;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub async fn load(&self) -> Result<PathBuf> {
        let hf_api = hf_hub::api::tokio::ApiBuilder::new()
            .with_chunk_size(None)
            .build()
            .map_err(|e| SentimentError::Download(e.to_string()))?;
        let hf_api = hf_api.model(self.repo.clone());

        // Retry logic for lock acquisition failures
        let max_retries = 3;
        let mut last_error = None;

        for attempt in 0..max_retries {
            match hf_api.get(self.filename.as_str()).await {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    if error_msg.contains("Lock acquisition failed") && attempt < max_retries - 1 {
                        // Wait before retrying, with exponential backoff
                        let wait_time = std::time::Duration::from_millis(100 * (1 << attempt));
                        tokio::time::sleep(wait_time).await;
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(SentimentError::Download(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "exhausted retries".to_string()),
        ))
    }
}

#[derive(Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        let tokenizer_file_loader = HfLoader::new(repo, filename);

        Self {
            tokenizer_file_loader,
        }
    }

    pub async fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load().await?;

        let tokenizer = Tokenizer::from_file(tokenizer_file_path)
            .map_err(|e| SentimentError::Tokenization(e.to_string()))?;

        Ok(tokenizer)
    }
}

/// Resolves the two files a sequence classifier needs: `config.json` and the
/// weight file (`model.safetensors`, falling back to `pytorch_model.bin`).
#[derive(Clone)]
pub struct ClassifierWeightsLoader {
    pub repo: String,
}

impl ClassifierWeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    pub async fn load(&self) -> Result<(PathBuf, PathBuf)> {
        let config_path = HfLoader::new(&self.repo, "config.json").load().await?;

        let weights_path = match HfLoader::new(&self.repo, "model.safetensors").load().await {
            Ok(path) => path,
            Err(_) => HfLoader::new(&self.repo, "pytorch_model.bin")
                .load()
                .await
                .map_err(|e| {
                    SentimentError::ModelLoad(format!(
                        "weights not found in {}: expected model.safetensors or pytorch_model.bin ({e})",
                        self.repo
                    ))
                })?,
        };

        Ok((config_path, weights_path))
    }
}
