//! Feature Vector Assembly

use crate::record::AisRecord;
use crate::timestamp::parse_timestamp;
use crate::ParseResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features the scaler and model were trained on
pub const FEATURE_DIMENSION: usize = 7;

/// Column order of the training frame. Changing it invalidates the artifacts.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "timestamp_sec",
    "mmsi",
    "latitude",
    "longitude",
    "sog",
    "cog",
    "heading",
];

/// Feature vector for ML inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values in `FEATURE_NAMES` order
    pub values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    /// Build the vector for one record.
    ///
    /// Only the timestamp can fail; numeric fields are copied as-is with no
    /// normalization or clamping.
    pub fn from_record(record: &AisRecord) -> ParseResult<Self> {
        let timestamp_sec = parse_timestamp(&record.timestamp_str)?;

        let values = [
            timestamp_sec,
            record.mmsi,
            record.latitude,
            record.longitude,
            record.sog,
            record.cog,
            record.heading,
        ];

        debug!("Vectorized record for mmsi={} at t={}", record.mmsi, timestamp_sec);

        Ok(Self { values })
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureError;

    fn feature(features: &FeatureVector, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| features.as_slice()[idx])
    }

    fn sample_record() -> AisRecord {
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

    #[test]
    fn test_vector_order() {
        let features = FeatureVector::from_record(&sample_record()).unwrap();

        assert_eq!(
            features.values,
            [1_709_005_339.0, 123_456_789.0, 10.0, 20.0, 5.0, 90.0, 95.0]
        );
        assert_eq!(features.as_slice().len(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_lookup_by_name() {
        let features = FeatureVector::from_record(&sample_record()).unwrap();

        assert_eq!(feature(&features, "cog"), Some(90.0));
        assert_eq!(feature(&features, "heading"), Some(95.0));
        assert_eq!(feature(&features, "draught"), None);
    }

    #[test]
    fn test_bad_timestamp_propagates() {
        let record = AisRecord {
            timestamp_str: "2024-02-27 03:42:19".to_string(),
            ..sample_record()
        };

        assert!(matches!(
            FeatureVector::from_record(&record),
            Err(FeatureError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_no_clamping() {
        let record = AisRecord {
            heading: 511.0,
            sog: 102.3,
            ..sample_record()
        };

        let features = FeatureVector::from_record(&record).unwrap();
        assert_eq!(feature(&features, "heading"), Some(511.0));
        assert_eq!(feature(&features, "sog"), Some(102.3));
    }
}
