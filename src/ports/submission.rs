//! Submission port - Interface to the persistence collaborator.
//!
//! Commits the finished dialogue to a per-form endpoint. Implementations
//! are expected to be idempotent-safe to retry: receiving the same
//! finalized history twice must not corrupt stored state.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::conversation::Turn;
use crate::domain::foundation::FormId;

/// The payload committed when a dialogue completes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// The full turn history plus the synthetic closing turn, oldest first.
    pub messages: Vec<Turn>,
    /// Always true on submission payloads.
    pub is_form_submitted: bool,
    /// Whether this session ran in preview mode.
    pub is_preview: bool,
}

impl SubmissionRequest {
    /// Creates a submission request.
    pub fn new(messages: Vec<Turn>, is_preview: bool) -> Self {
        Self {
            messages,
            is_form_submitted: true,
            is_preview,
        }
    }
}

/// Submission persistence errors.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    /// Network error during the write.
    #[error("network error: {0}")]
    Network(String),

    /// The persistence endpoint rejected the write.
    #[error("submission rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error details from the endpoint, if any.
        message: String,
    },
}

impl SubmissionError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Port for persisting a finished dialogue as the form's answers.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Writes the submission payload to the endpoint keyed by `form_id`.
    async fn persist(
        &self,
        form_id: &FormId,
        request: &SubmissionRequest,
    ) -> Result<(), SubmissionError>;
}
