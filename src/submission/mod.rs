//! Submission pipeline: sends a finished assessment to the CRM and the
//! document generator.
//!
//! The two sinks are independent: a failing CRM call never stops the
//! document from being generated, and both results are reported together
//! in a `SubmissionOutcome`.

pub mod coordinator;
pub mod payload;
pub mod sinks;

use serde::Serialize;

pub use coordinator::{
    CrmResult, DispatchMode, DocumentResult, SubmissionCoordinator, SubmissionOutcome,
    SubmissionState,
};
pub use payload::{CrmSummary, DocumentArtifact, artifact_file_name};
pub use sinks::{CrmSink, DocumentSink, HttpCrmSink, HttpDocumentSink};

/// Identifies an outbound sink in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Crm,
    Document,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crm => write!(f, "crm"),
            Self::Document => write!(f, "document"),
        }
    }
}
