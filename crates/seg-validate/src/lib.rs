//! Validation of the cleaned demographic feature table.
//!
//! A cleaned table must have exactly the columns the replacement accounting
//! predicts, none of the dropped columns, no row above the missing-value
//! cutoff, and only numeric values.

pub mod checks;
mod error;
mod validator;

pub use error::{Result, ValidationError};
pub use validator::validate_cleaned;
