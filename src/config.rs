//! Configuration types.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{ConfigError, Result};
use crate::submission::coordinator::DEFAULT_SINK_TIMEOUT;
use crate::submission::{
    DispatchMode, DocumentSink, HttpCrmSink, HttpDocumentSink, SubmissionCoordinator,
};

/// Outbound sink configuration.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// CRM sync endpoint.
    pub crm_url: String,
    /// Optional bearer token for the CRM endpoint.
    pub crm_token: Option<SecretString>,
    /// Document generation endpoint. No document is generated when unset.
    pub document_url: Option<String>,
    /// Bound on each outbound call.
    pub timeout: Duration,
    pub mode: DispatchMode,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            crm_url: "http://127.0.0.1:3000/api/hubspot".to_string(),
            crm_token: None,
            document_url: Some("http://127.0.0.1:3000/api/generate-pdf".to_string()),
            timeout: DEFAULT_SINK_TIMEOUT,
            mode: DispatchMode::Sequential,
        }
    }
}

impl SinkConfig {
    /// Load from `ASSESSMENT_*` environment variables.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let crm_url = lookup("ASSESSMENT_CRM_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ASSESSMENT_CRM_URL".to_string()))?;

        let crm_token = lookup("ASSESSMENT_CRM_TOKEN")
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let document_url = lookup("ASSESSMENT_DOCUMENT_URL").filter(|s| !s.trim().is_empty());

        let timeout = match lookup("ASSESSMENT_SINK_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ASSESSMENT_SINK_TIMEOUT_SECS".to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "ASSESSMENT_SINK_TIMEOUT_SECS".to_string(),
                        message: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SINK_TIMEOUT,
        };

        let mode = match lookup("ASSESSMENT_CONCURRENT_DISPATCH").as_deref() {
            Some("1" | "true" | "yes") => DispatchMode::Concurrent,
            _ => DispatchMode::Sequential,
        };

        Ok(Self {
            crm_url,
            crm_token,
            document_url,
            timeout,
            mode,
        })
    }

    /// Build the HTTP-backed submission coordinator.
    pub fn build_coordinator(&self) -> Result<SubmissionCoordinator> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("assessment-wizard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let crm = Arc::new(HttpCrmSink::new(
            client.clone(),
            self.crm_url.clone(),
            self.crm_token.clone(),
        ));
        let document = self.document_url.as_ref().map(|url| {
            Arc::new(HttpDocumentSink::new(client.clone(), url.clone())) as Arc<dyn DocumentSink>
        });

        Ok(SubmissionCoordinator::new(crm, document)
            .with_timeout(self.timeout)
            .with_mode(self.mode))
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("ASSESSMENT_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        Self { port }
    }
}
