//! SubmissionCoordinator: drives the CRM sync and document generation for a
//! finished assessment and folds both results into one outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assessment::model::AssessmentRecord;
use crate::error::{SinkError, SubmissionError};

use super::SinkKind;
use super::payload::{CrmSummary, DocumentArtifact};
use super::sinks::{CrmSink, DocumentSink};

/// Default bound on each outbound call.
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(30);

/// How the two outbound calls are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// CRM call completes before the document call is issued.
    #[default]
    Sequential,
    /// Both calls run together; the CRM call is polled first.
    Concurrent,
}

/// Where the coordinator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    InFlight,
    Completed,
}

/// Result of the CRM call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrmResult {
    Success,
    Failure { reason: String },
}

/// Result of the document call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentResult {
    Success,
    Failure { reason: String },
    /// No document sink is configured.
    NotAttempted,
}

/// Combined result of one submission attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub assessment_id: Uuid,
    pub crm_result: CrmResult,
    pub document_result: DocumentResult,
    /// Present only when the document call succeeded with a non-empty body.
    #[serde(skip)]
    pub artifact: Option<Arc<DocumentArtifact>>,
    pub artifact_name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SubmissionOutcome {
    pub fn artifact_produced(&self) -> bool {
        self.artifact.is_some()
    }

    /// Whether every attempted sink succeeded.
    pub fn is_success(&self) -> bool {
        self.crm_result == CrmResult::Success
            && !matches!(self.document_result, DocumentResult::Failure { .. })
    }

    /// The single end-of-flow message shown to the agent.
    pub fn notice(&self) -> &'static str {
        let crm_ok = self.crm_result == CrmResult::Success;
        // A successful document call with an empty body leaves nothing to download.
        match (&self.document_result, self.artifact_produced(), crm_ok) {
            (DocumentResult::Success, true, true) => {
                "Assessment completed! Data sent to CRM and document ready for download."
            }
            (DocumentResult::NotAttempted, _, true) => "Assessment completed! Data sent to CRM.",
            (DocumentResult::Success, true, false) => {
                "Assessment document generated, but the CRM update failed. Please sync the contact manually."
            }
            (_, _, true) => {
                "Data sent to CRM, but the assessment document could not be generated. Please try again."
            }
            (_, _, false) => "Error submitting assessment. Please try again.",
        }
    }
}

/// Releases the in-flight gate when dropped, even if the submit future is.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Dispatches a finished record to the CRM and document sinks.
///
/// Only one submission runs at a time; a second `submit` while one is in
/// flight is refused without touching either sink.
pub struct SubmissionCoordinator {
    crm: Arc<dyn CrmSink>,
    document: Option<Arc<dyn DocumentSink>>,
    timeout: Duration,
    mode: DispatchMode,
    in_flight: AtomicBool,
    completed: AtomicBool,
}

impl SubmissionCoordinator {
    pub fn new(crm: Arc<dyn CrmSink>, document: Option<Arc<dyn DocumentSink>>) -> Self {
        Self {
            crm,
            document,
            timeout: DEFAULT_SINK_TIMEOUT,
            mode: DispatchMode::default(),
            in_flight: AtomicBool::new(false),
            completed: AtomicBool::new(false),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> SubmissionState {
        if self.in_flight.load(Ordering::Acquire) {
            SubmissionState::InFlight
        } else if self.completed.load(Ordering::Acquire) {
            SubmissionState::Completed
        } else {
            SubmissionState::Idle
        }
    }

    /// Submit a snapshot of `record`.
    ///
    /// Sink failures never surface as errors; they are recorded in the
    /// returned outcome. The only error is a refused re-entrant call.
    pub async fn submit(
        &self,
        assessment_id: Uuid,
        record: &AssessmentRecord,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(assessment_id = %assessment_id, "Submission already in flight, ignoring trigger");
            return Err(SubmissionError::Reentrant);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
        };

        let started_at = Utc::now();
        info!(assessment_id = %assessment_id, mode = ?self.mode, "Submitting assessment");

        let summary = CrmSummary::from(record);
        let (crm_result, document_bytes) = match self.mode {
            DispatchMode::Sequential => {
                let crm = self.sync_crm(&summary).await;
                let document = self.generate_document(record).await;
                (crm, document)
            }
            DispatchMode::Concurrent => {
                tokio::join!(self.sync_crm(&summary), self.generate_document(record))
            }
        };

        let (document_result, artifact) = match document_bytes {
            None => (DocumentResult::NotAttempted, None),
            Some(Err(e)) => (
                DocumentResult::Failure {
                    reason: e.to_string(),
                },
                None,
            ),
            Some(Ok(bytes)) if bytes.is_empty() => {
                warn!(assessment_id = %assessment_id, "Document sink returned an empty body");
                (DocumentResult::Success, None)
            }
            Some(Ok(bytes)) => {
                let artifact = DocumentArtifact::new(&record.contact_name, bytes);
                (DocumentResult::Success, Some(Arc::new(artifact)))
            }
        };

        let outcome = SubmissionOutcome {
            assessment_id,
            crm_result,
            document_result,
            artifact_name: artifact.as_ref().map(|a| a.file_name.clone()),
            artifact,
            started_at,
            completed_at: Utc::now(),
        };

        self.completed.store(true, Ordering::Release);
        info!(
            assessment_id = %assessment_id,
            crm = ?outcome.crm_result,
            document = ?outcome.document_result,
            artifact = outcome.artifact_produced(),
            "Submission completed"
        );
        Ok(outcome)
    }

    async fn sync_crm(&self, summary: &CrmSummary) -> CrmResult {
        match tokio::time::timeout(self.timeout, self.crm.sync(summary)).await {
            Ok(Ok(())) => {
                debug!(sink = %SinkKind::Crm, "CRM accepted summary");
                CrmResult::Success
            }
            Ok(Err(e)) => {
                warn!(sink = %SinkKind::Crm, error = %e, "CRM sync failed");
                CrmResult::Failure {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                let e = SinkError::Timeout {
                    sink: SinkKind::Crm,
                    timeout: self.timeout,
                };
                warn!(sink = %SinkKind::Crm, error = %e, "CRM sync timed out");
                CrmResult::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// `None` when no document sink is configured.
    async fn generate_document(
        &self,
        record: &AssessmentRecord,
    ) -> Option<Result<Vec<u8>, SinkError>> {
        let sink = self.document.as_ref()?;
        let result = match tokio::time::timeout(self.timeout, sink.generate(record)).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout {
                sink: SinkKind::Document,
                timeout: self.timeout,
            }),
        };
        match &result {
            Ok(bytes) => debug!(sink = %SinkKind::Document, size = bytes.len(), "Document generated"),
            Err(e) => warn!(sink = %SinkKind::Document, error = %e, "Document generation failed"),
        }
        Some(result)
    }
}
