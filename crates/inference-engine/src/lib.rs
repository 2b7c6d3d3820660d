//! Autoencoder Inference Engine
//!
//! Loads the fitted scaler and the ONNX autoencoder once, then scores AIS
//! records by reconstruction error using tract-onnx.

mod autoencoder;
mod engine;
mod loader;
mod scaler;

pub use autoencoder::{OnnxAutoencoder, Reconstructor};
pub use engine::{
    classify, reconstruction_error, AnomalyDetector, AnomalyStatus, PredictionResult,
    DEFAULT_THRESHOLD,
};
pub use loader::{AssetLoader, AssetPaths};
pub use scaler::{FeatureScaler, Scaler, ScalerArtifact, ScalerKind};

use data_validator::ValidationError;
use feature_engine::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during scaling or model evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Non-finite value produced during {0}")]
    NonFinite(&'static str),
}

/// Result of a scaling or model step
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Errors while loading startup assets. Any of these is fatal.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Corrupt asset {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("Incompatible asset {}: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },
}

/// Errors from a single prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    InvalidTimestamp(#[from] FeatureError),
    #[error("Invalid field: {0}")]
    InvalidField(#[from] ValidationError),
    #[error("Prediction error: {0}")]
    Inference(#[from] InferenceError),
}

impl PredictionError {
    /// Whether the caller sent bad input, as opposed to a server-side failure
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PredictionError::InvalidTimestamp(_) | PredictionError::InvalidField(_)
        )
    }
}
