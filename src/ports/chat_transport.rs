//! Chat transport port - Interface to the answering agent.
//!
//! The transport accepts the ordered turn history and streams back the
//! agent's next turn as deltas, terminated by a finish signal. The core
//! does not generate agent responses; it only consumes them.

use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use thiserror::Error;

use crate::domain::conversation::Turn;

/// A streamed agent reply: deltas followed by a final chunk.
pub type TurnStream = Pin<Box<dyn Stream<Item = Result<TurnChunk, TransportError>> + Send>>;

/// Request for one chat round-trip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The full turn history, oldest first, including the just-sent user turn.
    pub messages: Vec<Turn>,
    /// Whether the session's answers have already been committed.
    pub is_form_submitted: bool,
    /// Whether this session runs in preview mode.
    pub is_preview: bool,
}

impl ChatRequest {
    /// Creates a chat request.
    pub fn new(messages: Vec<Turn>, is_form_submitted: bool, is_preview: bool) -> Self {
        Self {
            messages,
            is_form_submitted,
            is_preview,
        }
    }
}

/// One chunk of a streamed agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnChunk {
    /// New content in this chunk.
    pub delta: String,
    /// True on the terminating chunk of the round-trip.
    pub finished: bool,
}

impl TurnChunk {
    /// Creates a content chunk.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            finished: false,
        }
    }

    /// Creates the terminating chunk.
    pub fn end() -> Self {
        Self {
            delta: String::new(),
            finished: true,
        }
    }

    /// Returns true if this chunk terminates the round-trip.
    pub fn is_final(&self) -> bool {
        self.finished
    }
}

/// Chat transport errors.
///
/// The core defines no chat retry semantics; a failed round-trip is
/// surfaced to the caller and the session stalls until new user input.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network error during the round-trip.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The reply could not be interpreted.
    #[error("malformed reply: {0}")]
    Protocol(String),

    /// The round-trip timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl TransportError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

/// Port for the external chat transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Starts one round-trip: sends the history and streams back the
    /// agent's reply.
    ///
    /// The returned stream yields content deltas and ends with a chunk
    /// whose `is_final()` is true. An `Err` item aborts the round-trip;
    /// no finalized agent turn exists in that case.
    async fn stream_reply(&self, request: ChatRequest) -> Result<TurnStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_chunk_is_not_final() {
        let chunk = TurnChunk::content("Hello");
        assert!(!chunk.is_final());
        assert_eq!(chunk.delta, "Hello");
    }

    #[test]
    fn end_chunk_is_final_and_empty() {
        let chunk = TurnChunk::end();
        assert!(chunk.is_final());
        assert!(chunk.delta.is_empty());
    }

    #[test]
    fn request_serializes_with_camel_case_flags() {
        let request = ChatRequest::new(vec![Turn::user("hi").unwrap()], false, true);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["isFormSubmitted"], false);
        assert_eq!(json["isPreview"], true);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn errors_display_context() {
        assert_eq!(
            TransportError::Status { status: 502 }.to_string(),
            "endpoint returned status 502"
        );
        assert_eq!(
            TransportError::Timeout { timeout_secs: 30 }.to_string(),
            "request timed out after 30s"
        );
    }
}
