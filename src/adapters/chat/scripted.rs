//! Scripted chat transport for testing.
//!
//! Plays back pre-configured agent replies without a network, allowing the
//! session flow to run deterministically in tests.
//!
//! # Example
//!
//! ```ignore
//! let transport = ScriptedTransport::new()
//!     .with_reply("What is your name? [name]")
//!     .with_reply("Thanks! [finish]");
//! ```

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{ChatRequest, ChatTransport, TransportError, TurnChunk, TurnStream};

/// A configured scripted outcome for one round-trip.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Stream the given text, split into a handful of deltas.
    Reply(String),
    /// Fail the round-trip with a network error mid-stream.
    Failure(String),
}

/// Chat transport that replays a fixed script.
///
/// Replies are consumed in order; requests are recorded for verification.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedTransport {
    /// Creates an empty scripted transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful agent reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(text.into()));
        self
    }

    /// Queues a mid-stream failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Failure(message.into()));
        self
    }

    /// Queues another reply after construction.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(text.into()));
    }

    /// Returns the requests seen so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the number of round-trips started.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn stream_reply(&self, request: ChatRequest) -> Result<TurnStream, TransportError> {
        self.requests.lock().unwrap().push(request);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(ScriptedReply::Reply(text)) => {
                // Split the reply roughly in half so consumers see more
                // than one delta per round-trip.
                let mid = text
                    .char_indices()
                    .nth(text.chars().count() / 2)
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                let (head, tail) = text.split_at(mid);
                let chunks = vec![
                    Ok(TurnChunk::content(head)),
                    Ok(TurnChunk::content(tail)),
                    Ok(TurnChunk::end()),
                ];
                Ok(Box::pin(stream::iter(chunks)))
            }
            Some(ScriptedReply::Failure(message)) => {
                let chunks = vec![
                    Ok(TurnChunk::content("partial")),
                    Err(TransportError::network(message)),
                ];
                Ok(Box::pin(stream::iter(chunks)))
            }
            None => Err(TransportError::protocol("script exhausted")),
        }
    }
}
