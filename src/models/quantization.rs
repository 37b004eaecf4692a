//! Load-time weight-precision policy.
//!
//! Quantization runs exactly once, when the model is loaded. On CPU the 2-D
//! weight matrices are rounded through an 8-bit block format; on CUDA the
//! weights are loaded at half precision. If the reduced-precision path fails
//! for any reason the loader degrades to full F32 with a logged warning
//! rather than failing startup.

use crate::core::error::{Result, SentimentError};
use candle_core::quantized::{GgmlDType, QTensor};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Target weight representation for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightPrecision {
    /// 8-bit block quantization (CPU).
    Int8,
    /// Half-precision floats (CUDA).
    Half,
    /// Full precision, used as the graceful fallback.
    Full,
}

impl WeightPrecision {
    pub fn for_device(device: &Device) -> Self {
        if device.is_cuda() {
            WeightPrecision::Half
        } else {
            WeightPrecision::Int8
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPrecision::Int8 => "int8",
            WeightPrecision::Half => "f16",
            WeightPrecision::Full => "f32",
        }
    }
}

/// Build a `VarBuilder` over the weight file at the requested precision.
pub fn load_weights(
    weights_path: &Path,
    precision: WeightPrecision,
    device: &Device,
) -> Result<VarBuilder<'static>> {
    match precision {
        WeightPrecision::Half => load_dense(weights_path, DType::F16, device),
        WeightPrecision::Full => load_dense(weights_path, DType::F32, device),
        WeightPrecision::Int8 => match load_int8(weights_path, device) {
            Ok(vb) => Ok(vb),
            Err(e) => {
                warn!(error = %e, "int8 quantization failed, falling back to full precision");
                load_dense(weights_path, DType::F32, device)
            }
        },
    }
}

fn load_dense(weights_path: &Path, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
    if is_safetensors(weights_path) {
        let paths = [weights_path.to_path_buf()];
        Ok(unsafe { VarBuilder::from_mmaped_safetensors(&paths, dtype, device)? })
    } else {
        Ok(VarBuilder::from_pth(weights_path, dtype, device)?)
    }
}

/// Round every eligible weight matrix through Q8_0 and dequantize it back.
///
/// candle's ModernBERT consumes dense tensors, so the precision reduction is
/// applied to the values rather than the storage: each eligible matrix loses
/// everything an 8-bit block representation cannot carry.
fn load_int8(weights_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    if !is_safetensors(weights_path) {
        return Err(SentimentError::ModelLoad(
            "int8 path requires a safetensors checkpoint".to_string(),
        ));
    }

    let tensors = candle_core::safetensors::load(weights_path, device)?;
    let mut out: HashMap<String, Tensor> = HashMap::with_capacity(tensors.len());
    let mut quantized = 0usize;

    for (name, tensor) in tensors {
        let tensor = tensor.to_dtype(DType::F32)?;
        let tensor = if eligible(&name, &tensor) {
            quantized += 1;
            QTensor::quantize(&tensor, GgmlDType::Q8_0)?.dequantize(device)?
        } else {
            tensor
        };
        out.insert(name, tensor);
    }

    info!(quantized, "weight matrices rounded through q8_0");
    Ok(VarBuilder::from_tensors(out, DType::F32, device))
}

// Q8_0 blocks span 32 values along the last dimension. Norms, biases and the
// classifier head are left at full precision.
fn eligible(name: &str, tensor: &Tensor) -> bool {
    let dims = tensor.dims();
    name.ends_with(".weight")
        && !name.contains("norm")
        && !name.contains("classifier")
        && dims.len() == 2
        && dims[1] % 32 == 0
}

fn is_safetensors(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "safetensors")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_targets_int8() {
        assert_eq!(
            WeightPrecision::for_device(&Device::Cpu),
            WeightPrecision::Int8
        );
    }

    #[test]
    fn norms_and_heads_stay_dense() {
        let device = Device::Cpu;
        let mat = Tensor::zeros((4, 64), DType::F32, &device).unwrap();
        assert!(eligible("encoder.attn.Wqkv.weight", &mat));
        assert!(!eligible("encoder.mlp_norm.weight", &mat));
        assert!(!eligible("classifier.weight", &mat));

        let ragged = Tensor::zeros((4, 63), DType::F32, &device).unwrap();
        assert!(!eligible("encoder.attn.Wqkv.weight", &ragged));
    }
}
