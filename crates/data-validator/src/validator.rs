//! Data Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::AisRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
///
/// Upper bounds include the AIS "not available" sentinels (lat 91, lon 181,
/// sog 102.3, cog 360) since those appear in raw feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// MMSI valid range
    pub mmsi_range: (f64, f64),
    /// Latitude valid range (degrees)
    pub latitude_range: (f64, f64),
    /// Longitude valid range (degrees)
    pub longitude_range: (f64, f64),
    /// Speed over ground valid range (knots)
    pub sog_range: (f64, f64),
    /// Course over ground valid range (degrees)
    pub cog_range: (f64, f64),
    /// Heading valid range (degrees)
    pub heading_range: (f64, f64),
    /// Heading value meaning "not available"
    pub heading_unavailable: Option<f64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mmsi_range: (0.0, 999_999_999.0),
            latitude_range: (-90.0, 91.0),
            longitude_range: (-180.0, 181.0),
            sog_range: (0.0, 102.3),
            cog_range: (0.0, 360.0),
            heading_range: (0.0, 359.0),
            heading_unavailable: Some(511.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Convert into the first error, if any
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Field validator for AIS records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate MMSI
    pub fn validate_mmsi(&self, mmsi: f64) -> Result<(), ValidationError> {
        self.validate_range("mmsi", mmsi, self.config.mmsi_range)
    }

    /// Validate latitude
    pub fn validate_latitude(&self, lat: f64) -> Result<(), ValidationError> {
        self.validate_range("latitude", lat, self.config.latitude_range)
    }

    /// Validate longitude
    pub fn validate_longitude(&self, lon: f64) -> Result<(), ValidationError> {
        self.validate_range("longitude", lon, self.config.longitude_range)
    }

    /// Validate speed over ground
    pub fn validate_sog(&self, sog: f64) -> Result<(), ValidationError> {
        self.validate_range("sog", sog, self.config.sog_range)
    }

    /// Validate course over ground
    pub fn validate_cog(&self, cog: f64) -> Result<(), ValidationError> {
        self.validate_range("cog", cog, self.config.cog_range)
    }

    /// Validate heading, accepting the "not available" sentinel
    pub fn validate_heading(&self, heading: f64) -> Result<(), ValidationError> {
        if self.config.heading_unavailable == Some(heading) {
            return Ok(());
        }
        self.validate_range("heading", heading, self.config.heading_range)
    }

    /// Validate every numeric field of a record, collecting all violations
    pub fn validate(&self, record: &AisRecord) -> ValidationResult {
        let checks = [
            self.validate_mmsi(record.mmsi),
            self.validate_latitude(record.latitude),
            self.validate_longitude(record.longitude),
            self.validate_sog(record.sog),
            self.validate_cog(record.cog),
            self.validate_heading(record.heading),
        ];
        let fields_checked = checks.len();

        let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
        if !errors.is_empty() {
            debug!("Record for mmsi={} failed {} check(s)", record.mmsi, errors.len());
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            fields_checked,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
