//! Individual checks run by the validator.

pub mod columns;
pub mod datatype;
pub mod missing;
