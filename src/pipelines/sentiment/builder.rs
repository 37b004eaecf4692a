use super::engine::SentimentEngine;
use crate::core::{EngineConfig, Result};
use crate::models::{ModernBertSize, SentimentModernBertModel};
use crate::utils::DeviceRequest;

pub struct SentimentEngineBuilder {
    size: ModernBertSize,
    device_request: DeviceRequest,
    config: EngineConfig,
}

impl SentimentEngineBuilder {
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self {
            size,
            device_request: DeviceRequest::Default,
            config: EngineConfig::default(),
        }
    }

    pub fn cpu(mut self) -> Self {
        self.device_request = DeviceRequest::Cpu;
        self
    }

    pub fn cuda_device(mut self, index: usize) -> Self {
        self.device_request = DeviceRequest::Cuda(index);
        self
    }

    pub fn device(mut self, device: candle_core::Device) -> Self {
        self.device_request = DeviceRequest::Explicit(device);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn max_review_chars(mut self, max: usize) -> Self {
        self.config.max_review_chars = max;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.queue_depth = depth;
        self
    }

    /// Resolve the device, download and quantize the model, and return a
    /// warm engine. Model load happens here, once; the engine never reloads
    /// during normal operation.
    pub async fn build(self) -> Result<SentimentEngine<SentimentModernBertModel>> {
        let device = self.device_request.resolve()?;
        let model = SentimentModernBertModel::load(self.size, device).await?;
        Ok(SentimentEngine::with_model(self.config, model))
    }
}
