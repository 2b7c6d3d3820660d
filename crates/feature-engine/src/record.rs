//! AIS Position Record

use serde::{Deserialize, Serialize};

/// Timestamp used when a client omits `timestamp_str`
pub const DEFAULT_TIMESTAMP: &str = "27/02/2024 03:42:19";

fn default_timestamp() -> String {
    DEFAULT_TIMESTAMP.to_string()
}

/// One AIS position report as received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisRecord {
    /// Report time, `DD/MM/YYYY HH:MM:SS`
    #[serde(default = "default_timestamp")]
    pub timestamp_str: String,
    /// Vessel identity. Kept as a float to match the training layout.
    pub mmsi: f64,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Speed over ground (knots)
    pub sog: f64,
    /// Course over ground (degrees)
    pub cog: f64,
    /// True heading (degrees)
    pub heading: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "timestamp_str": "27/02/2024 03:42:19",
            "mmsi": 123456789,
            "latitude": 10.0,
            "longitude": 20.0,
            "sog": 5.0,
            "cog": 90.0,
            "heading": 95.0
        }"#;

        let record: AisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.mmsi, 123_456_789.0);
        assert_eq!(record.heading, 95.0);
    }

    #[test]
    fn test_missing_timestamp_uses_default() {
        let json = r#"{"mmsi": 24700, "latitude": 37.802, "longitude": -122.405,
                       "sog": 12.5, "cog": 245.0, "heading": 242.0}"#;

        let record: AisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp_str, DEFAULT_TIMESTAMP);
    }

    #[test]
    fn test_numeric_fields_are_required() {
        let json = r#"{"timestamp_str": "27/02/2024 03:42:19", "mmsi": 1,
                       "latitude": 1.0, "longitude": 1.0, "sog": 1.0, "cog": 1.0}"#;

        assert!(serde_json::from_str::<AisRecord>(json).is_err());
    }
}
