//! Assessment Wizard: multi-step insurance intake with CRM and document
//! submission.

pub mod assessment;
pub mod config;
pub mod error;
pub mod routes;
pub mod submission;
