//! Error types for the assessment wizard.

use std::time::Duration;

use crate::submission::SinkKind;

/// Top-level error type for the wizard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// The kind of value a record field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Flag,
    Integer,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "string"),
            Self::Flag => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
        }
    }
}

/// Field editor contract violations.
///
/// These indicate the caller did not validate its input before reaching the
/// editor; the record is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Field {field} expects a {expected} value, got {actual}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Index {index} out of range for {collection} (length {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Outbound sink failures.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{sink} request failed: {reason}")]
    RequestFailed { sink: SinkKind, reason: String },

    #[error("{sink} rejected the request with status {status}")]
    Rejected { sink: SinkKind, status: u16 },

    #[error("{sink} timed out after {timeout:?}")]
    Timeout { sink: SinkKind, timeout: Duration },
}

impl SinkError {
    /// Which sink produced this failure.
    pub fn sink(&self) -> SinkKind {
        match self {
            Self::RequestFailed { sink, .. }
            | Self::Rejected { sink, .. }
            | Self::Timeout { sink, .. } => *sink,
        }
    }
}

/// Submission lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("A submission is already in flight")]
    Reentrant,

    #[error("Submission is only available on the final step (current step {step})")]
    NotAtFinalStep { step: u8 },
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_reports_its_sink() {
        let err = SinkError::Rejected {
            sink: SinkKind::Crm,
            status: 502,
        };
        assert_eq!(err.sink(), SinkKind::Crm);
        assert_eq!(err.to_string(), "crm rejected the request with status 502");

        let err = SinkError::Timeout {
            sink: SinkKind::Document,
            timeout: Duration::from_secs(3),
        };
        assert_eq!(err.sink(), SinkKind::Document);
    }

    #[test]
    fn editor_errors_convert_into_top_level() {
        let err: Error = EditorError::UnknownField("shoeSize".into()).into();
        assert!(matches!(err, Error::Editor(EditorError::UnknownField(_))));
        assert_eq!(err.to_string(), "Editor error: Unknown field: shoeSize");
    }

    #[test]
    fn type_mismatch_message_names_both_kinds() {
        let err = EditorError::TypeMismatch {
            field: "autoNeeded".into(),
            expected: ValueKind::Flag,
            actual: ValueKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "Field autoNeeded expects a boolean value, got string"
        );
    }
}
