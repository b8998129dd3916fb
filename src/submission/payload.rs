//! What each sink receives, and how the returned document is named.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::assessment::model::{AssessmentRecord, Urgency};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Content type of the generated assessment document.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

/// The contact-level slice of a record sent to the CRM.
///
/// Carries no vehicle, property or narrative detail; those only go into the
/// generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmSummary {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub industry: String,
    pub lead_score: u8,
    pub urgency: Urgency,
    pub fit_score: u8,
    pub auto_needed: bool,
    pub home_needed: bool,
}

impl From<&AssessmentRecord> for CrmSummary {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            contact_name: record.contact_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            website: record.website.clone(),
            industry: record.industry.clone(),
            lead_score: record.lead_score,
            urgency: record.urgency,
            fit_score: record.fit_score,
            auto_needed: record.auto_needed,
            home_needed: record.home_needed,
        }
    }
}

/// Replace every run of whitespace with a single `-`.
pub fn slug(name: &str) -> String {
    WHITESPACE_RUN.replace_all(name, "-").into_owned()
}

/// Download name for the document generated for `contact_name`.
pub fn artifact_file_name(contact_name: &str) -> String {
    format!("insurance-assessment-{}.pdf", slug(contact_name))
}

/// A generated document, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl DocumentArtifact {
    pub fn new(contact_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: artifact_file_name(contact_name),
            content_type: DOCUMENT_CONTENT_TYPE,
            bytes,
        }
    }

    /// `Content-Disposition` value for downloading this document.
    ///
    /// The quoted `filename` keeps only visible ASCII, with `"` and `\`
    /// replaced, so the header is always valid. `filename*` carries the exact
    /// name percent-encoded as UTF-8.
    pub fn content_disposition(&self) -> String {
        let fallback: String = self
            .file_name
            .chars()
            .map(|c| match c {
                '"' | '\\' => '_',
                c if c.is_ascii_graphic() || c == ' ' => c,
                _ => '_',
            })
            .collect();
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(&self.file_name)
        )
    }
}
