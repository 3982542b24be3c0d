//! Endpoint configuration for the chat and submission boundaries.

use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::FormId;

use super::error::ValidationError;

/// Configuration for the per-form conversation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the form service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EndpointConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the conversation URL for a form.
    ///
    /// Both the chat round-trip and the submission write POST here.
    pub fn conversation_url(&self, form_id: &FormId) -> String {
        format!(
            "{}/api/form/{}/conversation",
            self.base_url.trim_end_matches('/'),
            form_id
        )
    }

    /// Validate endpoint configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}
