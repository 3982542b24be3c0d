//! HTTP submission sink.
//!
//! POSTs the finished dialogue to the per-form conversation endpoint.
//! The endpoint is expected to collapse duplicate submissions of the
//! same finalized history.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::EndpointConfig;
use crate::domain::foundation::FormId;
use crate::ports::{SubmissionError, SubmissionRequest, SubmissionSink};

/// Submission sink speaking to the form service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSubmissionSink {
    client: Client,
    config: EndpointConfig,
}

impl HttpSubmissionSink {
    /// Creates a sink for the configured form service.
    pub fn new(config: EndpointConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn persist(
        &self,
        form_id: &FormId,
        request: &SubmissionRequest,
    ) -> Result<(), SubmissionError> {
        let url = self.config.conversation_url(form_id);
        tracing::debug!(%url, turns = request.messages.len(), "persisting submission");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SubmissionError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "submission rejected");
            return Err(SubmissionError::rejected(status.as_u16(), message));
        }

        tracing::info!(form_id = %form_id, "submission persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_endpoint_config() {
        let sink = HttpSubmissionSink::new(EndpointConfig::default());
        let form_id = FormId::new();
        assert!(sink
            .config
            .conversation_url(&form_id)
            .ends_with("/conversation"));
    }
}
