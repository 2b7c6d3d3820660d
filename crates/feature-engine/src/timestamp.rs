//! AIS Timestamp Parsing

use chrono::NaiveDateTime;

use crate::{FeatureError, ParseResult};

/// Day-first layout used by the AIS feed
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse a `DD/MM/YYYY HH:MM:SS` string into seconds since the Unix epoch.
///
/// The timestamp carries no zone and is read as UTC. Anything that does not
/// match the layout, such as ISO-style dates or trailing text, is rejected.
pub fn parse_timestamp(input: &str) -> ParseResult<f64> {
    let parsed = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).map_err(|e| {
        FeatureError::InvalidTimestamp {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(parsed.and_utc().timestamp() as f64)
}
