//! Validation failures.

use chrono::{DateTime, Utc};

/// Why a record, or a schema being built for it, was rejected.
///
/// Every variant names the offending field. The `Display` text is what the
/// product handlers send back as a `400` body, so keep it human readable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{field}` has an invalid pattern `{tag}`: {reason}")]
    InvalidPattern {
        field: &'static str,
        tag: String,
        reason: String,
    },

    #[error("field `{field}` does not match pattern `{tag}`")]
    PatternMismatch { field: &'static str, tag: String },

    #[error("field `{field}` has a malformed range tag")]
    MalformedRange { field: &'static str },

    #[error("field `{field}` is less than {min}")]
    BelowMinimum { field: &'static str, min: f32 },

    #[error("field `{field}` is more than {max}")]
    AboveMaximum { field: &'static str, max: f32 },

    #[error("field `{field}` has a malformed period tag")]
    MalformedPeriod { field: &'static str },

    #[error("field `{field}` uses unsupported unit `{unit}`")]
    UnsupportedUnit { field: &'static str, unit: String },

    #[error("field `{field}` has a period boundary out of range")]
    PeriodOutOfRange { field: &'static str },

    #[error("field `{field}` is not after {boundary}")]
    NotAfter {
        field: &'static str,
        boundary: DateTime<Utc>,
    },

    #[error("field `{field}` is not before {boundary}")]
    NotBefore {
        field: &'static str,
        boundary: DateTime<Utc>,
    },

    #[error("field `{field}` has an unsupported datatype")]
    UnsupportedDatatype { field: &'static str },
}

impl ValidationError {
    /// Name of the field the error is about.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidPattern { field, .. }
            | Self::PatternMismatch { field, .. }
            | Self::MalformedRange { field }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::MalformedPeriod { field }
            | Self::UnsupportedUnit { field, .. }
            | Self::PeriodOutOfRange { field }
            | Self::NotAfter { field, .. }
            | Self::NotBefore { field, .. }
            | Self::UnsupportedDatatype { field } => *field,
        }
    }
}
