//! Outbound sinks: the CRM sync endpoint and the document generator.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::assessment::model::AssessmentRecord;
use crate::error::SinkError;

use super::SinkKind;
use super::payload::CrmSummary;

/// Receives the contact-level summary of a completed assessment.
#[async_trait]
pub trait CrmSink: Send + Sync {
    /// Push the summary. `Ok` means the CRM accepted it.
    async fn sync(&self, summary: &CrmSummary) -> Result<(), SinkError>;
}

/// Renders a full record into a downloadable document.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Render the record, returning the document bytes.
    async fn generate(&self, record: &AssessmentRecord) -> Result<Vec<u8>, SinkError>;
}

/// CRM sink that POSTs the summary as JSON.
pub struct HttpCrmSink {
    client: reqwest::Client,
    url: String,
    token: Option<SecretString>,
}

impl HttpCrmSink {
    pub fn new(client: reqwest::Client, url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl CrmSink for HttpCrmSink {
    async fn sync(&self, summary: &CrmSummary) -> Result<(), SinkError> {
        let mut request = self.client.post(&self.url).json(summary);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request.send().await.map_err(|e| SinkError::RequestFailed {
            sink: SinkKind::Crm,
            reason: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "CRM rejected summary");
            return Err(SinkError::Rejected {
                sink: SinkKind::Crm,
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

/// Document sink that POSTs the full record as JSON and reads back the PDF.
pub struct HttpDocumentSink {
    client: reqwest::Client,
    url: String,
}

impl HttpDocumentSink {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DocumentSink for HttpDocumentSink {
    async fn generate(&self, record: &AssessmentRecord) -> Result<Vec<u8>, SinkError> {
        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| SinkError::RequestFailed {
                sink: SinkKind::Document,
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                sink: SinkKind::Document,
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| SinkError::RequestFailed {
            sink: SinkKind::Document,
            reason: format!("Failed to read document body: {e}"),
        })?;
        Ok(bytes.to_vec())
    }
}
