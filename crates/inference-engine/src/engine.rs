//! Anomaly Detector Implementation

use crate::autoencoder::Reconstructor;
use crate::scaler::FeatureScaler;
use crate::{InferenceError, InferenceResult, PredictionError};
use data_validator::Validator;
use feature_engine::{AisRecord, FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Reconstruction error above which a record is anomalous
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Classification of a scored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyStatus {
    Normal,
    Anomalous,
}

impl AnomalyStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyStatus::Normal => "Normal",
            AnomalyStatus::Anomalous => "Anomalous",
        }
    }

    /// Whether this status flags an anomaly
    pub fn is_anomaly(&self) -> bool {
        matches!(self, AnomalyStatus::Anomalous)
    }
}

impl fmt::Display for AnomalyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Whether the record is anomalous
    pub anomaly: bool,
    /// Mean squared reconstruction error
    pub score: f64,
    /// Threshold the score was compared against
    pub threshold: f64,
    /// Human-readable classification
    pub status: AnomalyStatus,
}

/// Mean squared error between the scaled input and its reconstruction
pub fn reconstruction_error(input: &[f64], reconstructed: &[f64]) -> InferenceResult<f64> {
    if input.len() != reconstructed.len() {
        return Err(InferenceError::InvalidInputShape {
            expected: input.len(),
            actual: reconstructed.len(),
        });
    }
    if input.is_empty() {
        return Err(InferenceError::InferenceFailed("empty feature vector".to_string()));
    }

    let sum: f64 = input
        .iter()
        .zip(reconstructed)
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    let mse = sum / input.len() as f64;

    if !mse.is_finite() {
        return Err(InferenceError::NonFinite("scoring"));
    }
    Ok(mse)
}

/// Strictly greater than the threshold is anomalous; equal is normal
pub fn classify(score: f64, threshold: f64) -> AnomalyStatus {
    if score > threshold {
        AnomalyStatus::Anomalous
    } else {
        AnomalyStatus::Normal
    }
}

/// Scores AIS records with a fitted scaler and a reconstruction model.
///
/// Built once at startup and shared read-only across requests.
pub struct AnomalyDetector {
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn Reconstructor>,
    validator: Validator,
    threshold: f64,
}

impl AnomalyDetector {
    /// Create a detector with the default field validator
    pub fn new<S, R>(scaler: S, model: R, threshold: f64) -> Self
    where
        S: FeatureScaler + 'static,
        R: Reconstructor + 'static,
    {
        Self {
            scaler: Box::new(scaler),
            model: Box::new(model),
            validator: Validator::default(),
            threshold,
        }
    }

    /// Replace the field validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Get the classification threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run the full pipeline on one record
    pub fn predict(&self, record: &AisRecord) -> Result<PredictionResult, PredictionError> {
        let start = Instant::now();

        let features = FeatureVector::from_record(record)?;
        self.validator.validate(record).into_result()?;

        let score = self.score(&features)?;
        let status = classify(score, self.threshold);

        debug!(
            "Scored mmsi={} score={:.6} status={} in {}us",
            record.mmsi,
            score,
            status,
            start.elapsed().as_micros()
        );

        Ok(PredictionResult {
            anomaly: status.is_anomaly(),
            score,
            threshold: self.threshold,
            status,
        })
    }

    /// Scale, reconstruct and score an already-built feature vector
    pub fn score(&self, features: &FeatureVector) -> InferenceResult<f64> {
        let scaled = self.scaler.transform(features.as_slice())?;
        let reconstructed = self.model.reconstruct(&scaled)?;
        reconstruction_error(&scaled, &reconstructed)
    }

    /// Check that the scaler and model agree on the feature width.
    ///
    /// The model runs at the origin of the scaled space, so the check does
    /// not depend on how far the scaler's fitted offsets sit from zero.
    pub(crate) fn probe(&self) -> InferenceResult<f64> {
        let scaled = self.scaler.transform(FeatureVector::default().as_slice())?;
        if scaled.len() != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: scaled.len(),
            });
        }

        let origin = [0.0; FEATURE_DIMENSION];
        let reconstructed = self.model.reconstruct(&origin)?;
        reconstruction_error(&origin, &reconstructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scaler;
    use feature_engine::{FeatureError, FEATURE_DIMENSION};
    use proptest::prelude::*;

    /// Maps every input to the zero vector
    struct ZeroScaler;

    impl FeatureScaler for ZeroScaler {
        fn transform(&self, _features: &[f64]) -> InferenceResult<Vec<f64>> {
            Ok(vec![0.0; FEATURE_DIMENSION])
        }
    }

    /// Fails the test if reached
    struct UnreachableScaler;

    impl FeatureScaler for UnreachableScaler {
        fn transform(&self, _features: &[f64]) -> InferenceResult<Vec<f64>> {
            panic!("scaler must not run for rejected input");
        }
    }

    /// Always returns the same reconstruction
    struct FixedOutput(Vec<f64>);

    impl Reconstructor for FixedOutput {
        fn reconstruct(&self, _input: &[f64]) -> InferenceResult<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    /// Returns its input shifted by a constant
    struct Shift(f64);

    impl Reconstructor for Shift {
        fn reconstruct(&self, input: &[f64]) -> InferenceResult<Vec<f64>> {
            Ok(input.iter().map(|v| v + self.0).collect())
        }
    }

    struct BrokenModel;

    impl Reconstructor for BrokenModel {
        fn reconstruct(&self, _input: &[f64]) -> InferenceResult<Vec<f64>> {
            Err(InferenceError::InferenceFailed("session poisoned".to_string()))
        }
    }

    fn record() -> AisRecord {
        AisRecord {
            timestamp_str: "27/02/2024 03:42:19".to_string(),
            mmsi: 123_456_789.0,
            latitude: 10.0,
            longitude: 20.0,
            sog: 5.0,
            cog: 90.0,
            heading: 95.0,
        }
    }

    /// Reconstruction off by `d` in the first component only
    fn one_off(d: f64) -> FixedOutput {
        let mut out = vec![0.0; FEATURE_DIMENSION];
        out[0] = d;
        FixedOutput(out)
    }

    #[test]
    fn test_mse() {
        assert_eq!(reconstruction_error(&[1.0, 2.0], &[1.0, 4.0]).unwrap(), 2.0);
        assert_eq!(reconstruction_error(&[0.5; 3], &[0.5; 3]).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_shape_mismatch() {
        assert_eq!(
            reconstruction_error(&[1.0, 2.0], &[1.0]),
            Err(InferenceError::InvalidInputShape { expected: 2, actual: 1 })
        );
        assert!(reconstruction_error(&[], &[]).is_err());
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(classify(0.1, 0.1), AnomalyStatus::Normal);
        assert_eq!(classify(0.1 + f64::EPSILON, 0.1), AnomalyStatus::Anomalous);
        assert_eq!(classify(0.0, 0.1), AnomalyStatus::Normal);
    }

    #[test]
    fn test_score_equal_to_threshold_is_normal() {
        // 0.7 / 7 == 0.1
        let detector = AnomalyDetector::new(ZeroScaler, one_off(0.7f64.sqrt()), DEFAULT_THRESHOLD);

        let result = detector.predict(&record()).unwrap();
        assert_eq!(result.score, DEFAULT_THRESHOLD);
        assert_eq!(result.status, AnomalyStatus::Normal);
        assert!(!result.anomaly);
    }

    #[test]
    fn test_normal_record() {
        let detector = AnomalyDetector::new(ZeroScaler, one_off(0.35f64.sqrt()), DEFAULT_THRESHOLD);

        let result = detector.predict(&record()).unwrap();
        assert!((result.score - 0.05).abs() < 1e-12);
        assert_eq!(result.threshold, 0.1);
        assert_eq!(result.status, AnomalyStatus::Normal);
        assert!(!result.anomaly);
    }

    #[test]
    fn test_anomalous_record() {
        let detector = AnomalyDetector::new(ZeroScaler, one_off(1.4f64.sqrt()), DEFAULT_THRESHOLD);

        let result = detector.predict(&record()).unwrap();
        assert!((result.score - 0.2).abs() < 1e-12);
        assert_eq!(result.status, AnomalyStatus::Anomalous);
        assert!(result.anomaly);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let scaler = Scaler::standard(
            [1.7e9, 2.0e8, 0.0, 0.0, 10.0, 180.0, 180.0],
            [1.0e7, 1.0e8, 45.0, 90.0, 5.0, 100.0, 100.0],
        )
        .unwrap();
        let detector = AnomalyDetector::new(scaler, Shift(0.25), DEFAULT_THRESHOLD);

        let first = detector.predict(&record()).unwrap();
        let second = detector.predict(&record()).unwrap();
        assert_eq!(first, second);
        assert!((first.score - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_bad_timestamp_never_reaches_scaler() {
        let detector = AnomalyDetector::new(UnreachableScaler, Shift(0.0), DEFAULT_THRESHOLD);
        let bad = AisRecord {
            timestamp_str: "2024-02-27 03:42:19".to_string(),
            ..record()
        };

        let err = detector.predict(&bad).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(
            err,
            PredictionError::InvalidTimestamp(FeatureError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_out_of_range_field_is_invalid_input() {
        let detector = AnomalyDetector::new(UnreachableScaler, Shift(0.0), DEFAULT_THRESHOLD);
        let bad = AisRecord {
            longitude: 270.0,
            ..record()
        };

        let err = detector.predict(&bad).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidField(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_model_failure_is_server_error() {
        let detector = AnomalyDetector::new(ZeroScaler, BrokenModel, DEFAULT_THRESHOLD);

        let err = detector.predict(&record()).unwrap_err();
        assert!(!err.is_invalid_input());
        assert_eq!(err.to_string(), "Prediction error: Inference failed: session poisoned");
    }

    #[test]
    fn test_model_shape_mismatch() {
        let detector =
            AnomalyDetector::new(ZeroScaler, FixedOutput(vec![0.0; 3]), DEFAULT_THRESHOLD);

        assert!(matches!(
            detector.predict(&record()),
            Err(PredictionError::Inference(
                InferenceError::InvalidInputShape { expected: 7, actual: 3 }
            ))
        ));
    }

    #[test]
    fn test_custom_threshold() {
        let detector = AnomalyDetector::new(ZeroScaler, one_off(0.35f64.sqrt()), 0.01);

        let result = detector.predict(&record()).unwrap();
        assert_eq!(result.threshold, 0.01);
        assert!(result.anomaly);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_value(AnomalyStatus::Anomalous).unwrap();
        assert_eq!(json, serde_json::json!("Anomalous"));
    }

    proptest! {
        #[test]
        fn prop_score_is_non_negative(
            input in proptest::collection::vec(-1e6f64..1e6, FEATURE_DIMENSION),
            output in proptest::collection::vec(-1e6f64..1e6, FEATURE_DIMENSION),
        ) {
            let score = reconstruction_error(&input, &output).unwrap();
            prop_assert!(score >= 0.0);
        }
    }
}
