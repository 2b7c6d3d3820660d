//! ONNX Autoencoder

use crate::{AssetError, InferenceError, InferenceResult};
use feature_engine::FEATURE_DIMENSION;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// A model that reconstructs its (scaled) input
pub trait Reconstructor: Send + Sync {
    /// Reconstruct `input`; the output has the same length
    fn reconstruct(&self, input: &[f64]) -> InferenceResult<Vec<f64>>;
}

/// Autoencoder graph compiled with tract
pub struct OnnxAutoencoder {
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxAutoencoder {
    /// Load and optimize the ONNX graph for a `[1, FEATURE_DIMENSION]` f32 input
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::Missing(path.to_path_buf()));
        }
        info!("Loading autoencoder from {}", path.display());

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| AssetError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let incompatible = |e: TractError| AssetError::Incompatible {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let plan = model
            .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())
            .map_err(incompatible)?
            .into_optimized()
            .map_err(incompatible)?
            .into_runnable()
            .map_err(incompatible)?;

        Ok(Self { plan })
    }
}

impl Reconstructor for OnnxAutoencoder {
    fn reconstruct(&self, input: &[f64]) -> InferenceResult<Vec<f64>> {
        if input.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: input.len(),
            });
        }

        let data: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor = Tensor::from_shape(&[1, FEATURE_DIMENSION], &data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no output".to_string()))?;
        let output = output
            .cast_to::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let values = output
            .as_slice::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        if values.len() != input.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: input.len(),
                actual: values.len(),
            });
        }

        debug!("Reconstructed {} features", values.len());
        Ok(values.iter().map(|v| *v as f64).collect())
    }
}
