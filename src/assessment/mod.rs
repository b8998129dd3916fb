//! Assessment wizard: the record being collected, the step sequence that
//! walks an agent through it, and the edits the form applies to it.
//!
//! Step 2 (auto) and step 3 (home) are only shown when the matching branch
//! flag on the record is set. Moving forward passes straight through a gated
//! step; moving back does not skip.

pub mod editor;
pub mod model;
pub mod session;
pub mod state;

pub use editor::FieldValue;
pub use model::{AssessmentRecord, Driver, Urgency, Vehicle};
pub use session::{AssessmentSession, SessionStatus};
pub use state::{BranchFlags, STEP_COUNT, WizardStep};
