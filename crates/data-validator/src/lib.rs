//! Data Validation
//!
//! Field contract checks for AIS position reports before they are scored.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Validator, ValidationConfig, ValidationResult};
