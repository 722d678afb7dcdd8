//! Validation error types

use std::fmt;

/// Validation error for request payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// String field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Numeric field carries its zero value, which counts as unset
    Required { field: &'static str },

    /// Body is not valid JSON for the expected shape
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::Required { field } => write!(f, "{} is required", field),
            Self::MalformedBody { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
