//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails; only decoding host-supplied blobs can.

use thiserror::Error;

/// Errors that can occur when importing a learning profile blob
#[derive(Debug, Error)]
pub enum LearningError {
    /// Blob was empty or whitespace
    #[error("learning blob is empty")]
    Empty,
    /// JSON parsing failed
    #[error("learning blob decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur when loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    /// JSON parsing failed
    #[error("tuning decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// A field is outside its legal range
    #[error("invalid tuning value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}
