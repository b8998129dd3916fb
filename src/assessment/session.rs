//! AssessmentSession: the single owner of an in-progress assessment.
//!
//! Holds the record, the current wizard step and the submission
//! coordinator. Every edit takes the write lock once, so edits never
//! interleave; submission works on a snapshot and only the final
//! bookkeeping touches the session again.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EditorError, SubmissionError};
use crate::submission::{DocumentArtifact, SubmissionCoordinator, SubmissionOutcome, SubmissionState};

use super::editor::{self, FieldValue};
use super::model::AssessmentRecord;
use super::state::{BranchFlags, WizardStep};

struct SessionInner {
    assessment_id: Uuid,
    record: AssessmentRecord,
    step: WizardStep,
    artifact: Option<Arc<DocumentArtifact>>,
    last_outcome: Option<SubmissionOutcome>,
}

impl SessionInner {
    fn fresh() -> Self {
        Self {
            assessment_id: Uuid::new_v4(),
            record: AssessmentRecord::default(),
            step: WizardStep::default(),
            artifact: None,
            last_outcome: None,
        }
    }

    /// Completion is tracked per assessment, so a submission that started
    /// before a reset never marks the fresh record as completed.
    fn submission_state(&self, coordinator: &SubmissionCoordinator) -> SubmissionState {
        match coordinator.state() {
            SubmissionState::InFlight => SubmissionState::InFlight,
            _ if self.last_outcome.is_some() => SubmissionState::Completed,
            _ => SubmissionState::Idle,
        }
    }
}

/// Snapshot of the session for the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub assessment_id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub title: &'static str,
    pub progress_percent: u8,
    /// False when the current step is gated off by a branch flag.
    pub step_shown: bool,
    pub submission: SubmissionState,
    pub missing_required: Vec<&'static str>,
    pub artifact_name: Option<String>,
    pub record: AssessmentRecord,
}

/// One agent's in-progress assessment.
pub struct AssessmentSession {
    inner: RwLock<SessionInner>,
    coordinator: SubmissionCoordinator,
}

impl AssessmentSession {
    pub fn new(coordinator: SubmissionCoordinator) -> Self {
        let inner = SessionInner::fresh();
        info!(assessment_id = %inner.assessment_id, "Assessment started");
        Self {
            inner: RwLock::new(inner),
            coordinator,
        }
    }

    pub async fn assessment_id(&self) -> Uuid {
        self.inner.read().await.assessment_id
    }

    pub async fn current_step(&self) -> WizardStep {
        self.inner.read().await.step
    }

    /// A copy of the record as it stands now.
    pub async fn snapshot(&self) -> AssessmentRecord {
        self.inner.read().await.record.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.read().await;
        let flags = BranchFlags::from(&inner.record);
        SessionStatus {
            assessment_id: inner.assessment_id,
            step: inner.step,
            step_number: inner.step.number(),
            title: inner.step.title(),
            progress_percent: inner.step.progress_percent(),
            step_shown: inner.step.is_shown(flags),
            submission: inner.submission_state(&self.coordinator),
            missing_required: inner.record.missing_required_fields(),
            artifact_name: inner.artifact.as_ref().map(|a| a.file_name.clone()),
            record: inner.record.clone(),
        }
    }

    /// Move forward, passing through any step gated off by the record.
    pub async fn advance(&self) -> WizardStep {
        let mut inner = self.inner.write().await;
        let flags = BranchFlags::from(&inner.record);
        let from = inner.step;

        let mut step = from;
        loop {
            let next = step.next(flags);
            if next == step {
                break;
            }
            step = next;
            if step.is_shown(flags) {
                break;
            }
            debug!(step = %step, "Passing through gated step");
        }

        inner.step = step;
        info!(assessment_id = %inner.assessment_id, from = %from, to = %step, "Wizard advanced");
        step
    }

    /// Move back one step. Gated steps are not skipped on the way back.
    pub async fn retreat(&self) -> WizardStep {
        let mut inner = self.inner.write().await;
        let from = inner.step;
        inner.step = from.previous();
        info!(assessment_id = %inner.assessment_id, from = %from, to = %inner.step, "Wizard stepped back");
        inner.step
    }

    pub async fn set_scalar(&self, field: &str, value: FieldValue) -> Result<(), EditorError> {
        let mut inner = self.inner.write().await;
        editor::set_scalar(&mut inner.record, field, value)
            .inspect(|_| debug!(field, "Field updated"))
            .inspect_err(|e| warn!(field, error = %e, "Rejected field update"))
    }

    pub async fn set_vehicle_field(
        &self,
        index: usize,
        field: &str,
        value: FieldValue,
    ) -> Result<(), EditorError> {
        let mut inner = self.inner.write().await;
        editor::set_vehicle_field(&mut inner.record, index, field, value)
            .inspect(|_| debug!(index, field, "Vehicle field updated"))
            .inspect_err(|e| warn!(index, field, error = %e, "Rejected vehicle update"))
    }

    pub async fn set_driver_field(
        &self,
        index: usize,
        field: &str,
        value: FieldValue,
    ) -> Result<(), EditorError> {
        let mut inner = self.inner.write().await;
        editor::set_driver_field(&mut inner.record, index, field, value)
            .inspect(|_| debug!(index, field, "Driver field updated"))
            .inspect_err(|e| warn!(index, field, error = %e, "Rejected driver update"))
    }

    /// Returns the new vehicle count.
    pub async fn add_vehicle(&self) -> usize {
        let mut inner = self.inner.write().await;
        let count = editor::add_vehicle(&mut inner.record);
        debug!(count, "Vehicle added");
        count
    }

    /// Returns the new driver count.
    pub async fn add_driver(&self) -> usize {
        let mut inner = self.inner.write().await;
        let count = editor::add_driver(&mut inner.record);
        debug!(count, "Driver added");
        count
    }

    /// Submit the assessment from the final step.
    ///
    /// Edits made while the submission is in flight do not affect what is
    /// sent. The produced artifact (if any) replaces the previous one.
    pub async fn submit(&self) -> Result<SubmissionOutcome, SubmissionError> {
        let (assessment_id, snapshot) = {
            let inner = self.inner.read().await;
            if !inner.step.is_terminal() {
                return Err(SubmissionError::NotAtFinalStep {
                    step: inner.step.number(),
                });
            }
            (inner.assessment_id, inner.record.clone())
        };

        let outcome = self.coordinator.submit(assessment_id, &snapshot).await?;

        let mut inner = self.inner.write().await;
        if inner.assessment_id == assessment_id {
            inner.artifact = outcome.artifact.clone();
            inner.last_outcome = Some(outcome.clone());
        }
        Ok(outcome)
    }

    /// The document produced by the latest submission, if any.
    pub async fn artifact(&self) -> Option<Arc<DocumentArtifact>> {
        self.inner.read().await.artifact.clone()
    }

    pub async fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.inner.read().await.last_outcome.clone()
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.inner.read().await.submission_state(&self.coordinator)
    }

    /// Discard the record and start a new assessment at step 1.
    ///
    /// Refused while a submission is in flight.
    pub async fn reset(&self) -> Result<Uuid, SubmissionError> {
        let mut inner = self.inner.write().await;
        if self.coordinator.state() == SubmissionState::InFlight {
            return Err(SubmissionError::Reentrant);
        }
        let previous = inner.assessment_id;
        *inner = SessionInner::fresh();
        info!(previous = %previous, assessment_id = %inner.assessment_id, "Assessment reset");
        Ok(inner.assessment_id)
    }
}
