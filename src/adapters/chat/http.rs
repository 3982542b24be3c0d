//! HTTP chat transport.
//!
//! POSTs the turn history to the per-form conversation endpoint and
//! streams the agent's reply back as plain-text deltas.
//!
//! # Configuration
//!
//! ```ignore
//! let config = EndpointConfig::default();
//! let transport = HttpChatTransport::for_form(&config, form.id());
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::config::EndpointConfig;
use crate::domain::foundation::FormId;
use crate::ports::{ChatRequest, ChatTransport, TransportError, TurnChunk, TurnStream};

/// Chat transport speaking to the form service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpChatTransport {
    /// Creates a transport bound to one form's conversation endpoint.
    pub fn for_form(config: &EndpointConfig, form_id: &FormId) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.conversation_url(form_id),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Returns the endpoint this transport posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_request_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            TransportError::network(err.to_string())
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn stream_reply(&self, request: ChatRequest) -> Result<TurnStream, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            turns = request.messages.len(),
            "starting chat round-trip"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat endpoint rejected request");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        // The endpoint streams the reply body as UTF-8 text deltas; a
        // terminating chunk is appended once the body is exhausted.
        let deltas = response.bytes_stream().map(|item| match item {
            Ok(bytes) => Ok(TurnChunk::content(String::from_utf8_lossy(&bytes))),
            Err(e) => Err(TransportError::network(e.to_string())),
        });
        let terminated = deltas.chain(stream::once(async { Ok(TurnChunk::end()) }));

        Ok(Box::pin(terminated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_to_the_forms_conversation_endpoint() {
        let config = EndpointConfig::default();
        let form_id = FormId::new();
        let transport = HttpChatTransport::for_form(&config, &form_id);

        assert_eq!(transport.endpoint(), config.conversation_url(&form_id));
    }
}
