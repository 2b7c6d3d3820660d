//! Startup Asset Loader

use crate::autoencoder::{OnnxAutoencoder, Reconstructor};
use crate::engine::AnomalyDetector;
use crate::scaler::{FeatureScaler, Scaler};
use crate::AssetError;
use data_validator::{ValidationConfig, Validator};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Locations of the two trained artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// ONNX autoencoder
    pub model: PathBuf,
    /// Scaler JSON
    pub scaler: PathBuf,
}

impl AssetPaths {
    /// Resolve artifact files relative to an install directory
    pub fn resolve(base: &Path, model_file: &str, scaler_file: &str) -> Self {
        Self {
            model: base.join(model_file),
            scaler: base.join(scaler_file),
        }
    }
}

/// Loads the scaler and model once and assembles the detector
pub struct AssetLoader {
    paths: AssetPaths,
    threshold: f64,
    validation: ValidationConfig,
}

impl AssetLoader {
    /// Create a loader for the given paths and threshold
    pub fn new(paths: AssetPaths, threshold: f64) -> Self {
        Self {
            paths,
            threshold,
            validation: ValidationConfig::default(),
        }
    }

    /// Override the record validation ranges
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Load both artifacts and verify they work together.
    ///
    /// Nothing is returned unless both load and a probe reconstruction
    /// succeeds, so callers never see a half-initialized detector.
    pub fn load(&self) -> Result<AnomalyDetector, AssetError> {
        let start = Instant::now();

        info!("Loading scaler from {}", self.paths.scaler.display());
        let scaler = Scaler::load(&self.paths.scaler)?;

        let model = OnnxAutoencoder::load(&self.paths.model)?;

        let detector = self.assemble(scaler, model)?;

        info!(
            "Assets loaded in {}ms (threshold={})",
            start.elapsed().as_millis(),
            self.threshold
        );
        Ok(detector)
    }

    /// Assemble and probe a detector from already-loaded parts
    pub fn assemble<S, R>(&self, scaler: S, model: R) -> Result<AnomalyDetector, AssetError>
    where
        S: FeatureScaler + 'static,
        R: Reconstructor + 'static,
    {
        let detector = AnomalyDetector::new(scaler, model, self.threshold)
            .with_validator(Validator::new(self.validation.clone()));

        detector.probe().map_err(|e| {
            error!("Probe reconstruction failed: {}", e);
            AssetError::Incompatible {
                path: self.paths.model.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(detector)
    }
}
