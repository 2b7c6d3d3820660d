//! Fitted Feature Scaler

use crate::{AssetError, InferenceError, InferenceResult};
use feature_engine::{FEATURE_DIMENSION, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Forward transform applied to a feature vector before reconstruction
pub trait FeatureScaler: Send + Sync {
    /// Scale `features`, returning a vector of the same length
    fn transform(&self, features: &[f64]) -> InferenceResult<Vec<f64>>;
}

/// Kind of fitted transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// `(x - mean) / scale`
    Standard,
    /// `x * scale + min`
    MinMax,
}

/// Scaler parameters as exported from training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub kind: ScalerKind,
    /// Per-feature mean (standard only)
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    /// Per-feature offset (min-max only)
    #[serde(default)]
    pub min: Option<Vec<f64>>,
    /// Per-feature scale
    pub scale: Vec<f64>,
    /// Column names seen at fit time
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Validated, immutable scaler
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    kind: ScalerKind,
    offset: [f64; FEATURE_DIMENSION],
    scale: [f64; FEATURE_DIMENSION],
}

impl Scaler {
    /// Standardization with the given fitted mean and scale
    pub fn standard(
        mean: [f64; FEATURE_DIMENSION],
        scale: [f64; FEATURE_DIMENSION],
    ) -> Result<Self, String> {
        if let Some(idx) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(format!(
                "scale[{}] for '{}' must be finite and non-zero",
                idx, FEATURE_NAMES[idx]
            ));
        }
        check_finite("mean", &mean)?;

        Ok(Self {
            kind: ScalerKind::Standard,
            offset: mean,
            scale,
        })
    }

    /// Min-max scaling with the given fitted offset and scale
    pub fn min_max(
        min: [f64; FEATURE_DIMENSION],
        scale: [f64; FEATURE_DIMENSION],
    ) -> Result<Self, String> {
        check_finite("min", &min)?;
        check_finite("scale", &scale)?;

        Ok(Self {
            kind: ScalerKind::MinMax,
            offset: min,
            scale,
        })
    }

    /// Build from a deserialized artifact, checking it against the feature layout
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, String> {
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "feature names {:?} do not match expected order {:?}",
                    names, FEATURE_NAMES
                ));
            }
        }

        let scale = to_array("scale", artifact.scale)?;
        match artifact.kind {
            ScalerKind::Standard => {
                let mean = artifact.mean.ok_or("standard scaler requires 'mean'")?;
                Self::standard(to_array("mean", mean)?, scale)
            }
            ScalerKind::MinMax => {
                let min = artifact.min.ok_or("min-max scaler requires 'min'")?;
                Self::min_max(to_array("min", min)?, scale)
            }
        }
    }

    /// Load a scaler artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::Missing(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: ScalerArtifact =
            serde_json::from_str(&raw).map_err(|e| AssetError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let scaler = Self::from_artifact(artifact).map_err(|reason| AssetError::Incompatible {
            path: path.to_path_buf(),
            reason,
        })?;

        info!("Loaded {:?} scaler from {}", scaler.kind(), path.display());
        Ok(scaler)
    }

    /// Get the scaler kind
    pub fn kind(&self) -> ScalerKind {
        self.kind
    }
}

impl FeatureScaler for Scaler {
    fn transform(&self, features: &[f64]) -> InferenceResult<Vec<f64>> {
        if features.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: features.len(),
            });
        }

        let scaled: Vec<f64> = features
            .iter()
            .zip(self.offset.iter().zip(self.scale.iter()))
            .map(|(x, (offset, scale))| match self.kind {
                ScalerKind::Standard => (x - offset) / scale,
                ScalerKind::MinMax => x * scale + offset,
            })
            .collect();

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite("scaling"));
        }
        Ok(scaled)
    }
}

fn to_array(name: &str, values: Vec<f64>) -> Result<[f64; FEATURE_DIMENSION], String> {
    let len = values.len();
    values
        .try_into()
        .map_err(|_| format!("'{}' has {} values, expected {}", name, len, FEATURE_DIMENSION))
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), String> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(format!("{}[{}] is not finite", name, idx)),
        None => Ok(()),
    }
}
