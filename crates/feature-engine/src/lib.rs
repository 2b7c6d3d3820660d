//! Feature Engineering Engine
//!
//! Decodes AIS position reports and assembles the fixed-order feature
//! vector consumed by the scaler and autoencoder.

mod features;
mod record;
mod timestamp;

pub use features::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use record::{AisRecord, DEFAULT_TIMESTAMP};
pub use timestamp::{parse_timestamp, TIMESTAMP_FORMAT};

use thiserror::Error;

/// Errors while turning a record into features
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Invalid Timestamp Format: '{input}' does not match DD/MM/YYYY HH:MM:SS ({reason})")]
    InvalidTimestamp { input: String, reason: String },
}

/// Result of parsing client-supplied fields
pub type ParseResult<T> = Result<T, FeatureError>;
