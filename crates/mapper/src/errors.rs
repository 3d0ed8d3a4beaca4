//! Error taxonomy for the mapping pipeline.
//!
//! Every rejection is local to the record being processed: the consumer loop
//! and the HTTP server both carry on after any of these.

use thiserror::Error;

/// Errors that can occur while mapping a native video record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The inbound body is not a well-formed JSON object
    #[error("Native video JSON couldn't be unmarshalled: {0}")]
    InvalidJson(String),
    /// A required metadata header is absent
    #[error("{name} not found in message headers")]
    MissingHeader { name: String },
    /// A required body field is absent, null, or empty
    #[error("{field} field of native video JSON is missing or empty")]
    MissingField { field: String },
    /// A required body field is present but not a string
    #[error("{field} field of native video JSON is not a string")]
    InvalidField { field: String },
    /// Encoding an already-validated structure failed
    #[error("Couldn't marshal {what}: {detail}")]
    Serialization { what: &'static str, detail: String },
}

impl MapError {
    /// Convenience constructor for missing-header errors.
    pub fn missing_header(name: &str) -> Self {
        Self::MissingHeader {
            name: name.to_string(),
        }
    }

    /// Convenience constructor for missing-field errors.
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }

    /// Convenience constructor for invalid-field errors.
    pub fn invalid_field(field: &str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
        }
    }
}
