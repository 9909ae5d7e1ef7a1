//! Domain error types.

use crate::domain::universe::UniverseError;
use chrono::NaiveDateTime;

/// Top-level error type for comet.
#[derive(Debug, thiserror::Error)]
pub enum CometError {
    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("field {field} is not numeric: {value}")]
    InvalidField { field: String, value: String },

    #[error("invalid bar timestamp {value:?}, expected YYYYMMDDHHMMSS")]
    InvalidTimestamp { value: String },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    #[error("{key} is not in the universe")]
    OutOfUniverse { key: String },

    #[error("unknown instrument: {key}")]
    UnknownInstrument { key: String },

    #[error("no bar for {key} at or before {dt}")]
    NoData { key: String, dt: NaiveDateTime },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CometError {
    pub fn missing(field: &str) -> Self {
        CometError::MissingField {
            field: field.to_string(),
        }
    }
}
