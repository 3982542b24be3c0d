//! Chat stream - owns the turn history and drives round-trips.
//!
//! Wraps the external streaming transport: `send` appends the user turn,
//! streams the agent's reply while emitting delta events, and finalizes
//! exactly one agent turn per round-trip. If the transport errors
//! mid-stream, no agent turn is appended and the error is surfaced to the
//! caller; this layer defines no retry semantics.

use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::conversation::{Role, Turn, TurnAnnotation, TurnHistory};
use crate::domain::foundation::{DomainError, TurnId};
use crate::ports::{ChatRequest, ChatTransport, TransportError};

/// Capacity of the UI event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted while a round-trip is in progress.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A new delta of the streaming agent reply arrived.
    TurnDelta {
        /// Id of the agent turn being streamed.
        turn_id: TurnId,
        /// The new content.
        delta: String,
    },
    /// The agent turn was finalized and appended to the history.
    TurnFinished {
        /// The finalized turn.
        turn: Turn,
    },
    /// The round-trip failed; no agent turn was appended.
    TurnFailed {
        /// Error description.
        message: String,
    },
}

/// A finalized agent turn together with its parsed field marker.
///
/// The marker is parsed once here so downstream consumers work with
/// structured data instead of re-scanning the turn text.
#[derive(Debug, Clone)]
pub struct FinalizedTurn {
    /// The finalized agent turn.
    pub turn: Turn,
    /// The field marker parsed from the turn, if any.
    pub annotation: Option<TurnAnnotation>,
}

/// Chat stream errors.
#[derive(Debug, Error)]
pub enum ChatStreamError {
    /// The transport failed before or during the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The outgoing turn was invalid.
    #[error("invalid turn: {0}")]
    InvalidTurn(#[from] DomainError),
}

/// Owns the ordered turn history and the pending-input buffer, and runs
/// chat round-trips against the transport.
pub struct ChatStream<T: ChatTransport> {
    transport: Arc<T>,
    history: TurnHistory,
    input: String,
    events: mpsc::Sender<ChatEvent>,
}

impl<T: ChatTransport> ChatStream<T> {
    /// Creates a chat stream and the receiver for its UI events.
    pub fn new(transport: Arc<T>) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (
            Self {
                transport,
                history: TurnHistory::new(),
                input: String::new(),
                events: tx,
            },
            rx,
        )
    }

    /// Returns the turn history, oldest first.
    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    /// Returns the content of the most recent finalized agent turn, i.e.
    /// the question currently being answered.
    pub fn current_question(&self) -> &str {
        self.history
            .last_agent_turn()
            .map(|t| t.content())
            .unwrap_or("")
    }

    /// Returns the pending-input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending-input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Clears the pending-input buffer.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Discards the history and input buffer, starting a fresh attempt.
    pub fn reset(&mut self) {
        self.history = TurnHistory::new();
        self.input.clear();
    }

    /// Runs one round-trip: appends the user turn, streams the reply, and
    /// finalizes the agent turn.
    ///
    /// The caller is responsible for not invoking this while another
    /// round-trip is outstanding.
    ///
    /// # Errors
    ///
    /// - `InvalidTurn` if `content` is empty
    /// - `Transport` if the transport fails; the user turn remains in the
    ///   history but no agent turn is appended
    pub async fn send(
        &mut self,
        content: impl Into<String>,
        is_form_submitted: bool,
        is_preview: bool,
    ) -> Result<FinalizedTurn, ChatStreamError> {
        let user_turn = Turn::user(content)?;
        self.history.push(user_turn);

        let request = ChatRequest::new(self.history.snapshot(), is_form_submitted, is_preview);
        let mut reply = match self.transport.stream_reply(request).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "chat round-trip failed to start");
                self.emit(ChatEvent::TurnFailed {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        let turn_id = TurnId::new();
        let mut content = String::new();
        while let Some(item) = reply.next().await {
            match item {
                Ok(chunk) => {
                    let finished = chunk.is_final();
                    if !chunk.delta.is_empty() {
                        content.push_str(&chunk.delta);
                        self.emit(ChatEvent::TurnDelta {
                            turn_id,
                            delta: chunk.delta,
                        });
                    }
                    if finished {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "chat round-trip failed mid-stream");
                    self.emit(ChatEvent::TurnFailed {
                        message: err.to_string(),
                    });
                    return Err(err.into());
                }
            }
        }

        let turn = Turn::with_id(turn_id, Role::Agent, content)
            .map_err(|_| TransportError::protocol("agent reply was empty"))?;
        let annotation = TurnAnnotation::parse(turn.content());
        self.history.push(turn.clone());
        self.emit(ChatEvent::TurnFinished { turn: turn.clone() });

        Ok(FinalizedTurn { turn, annotation })
    }

    fn emit(&self, event: ChatEvent) {
        // UI updates are best effort; a slow or absent consumer never
        // stalls the round-trip.
        let _ = self.events.try_send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedTransport;

    fn stream_with(transport: ScriptedTransport) -> (ChatStream<ScriptedTransport>, mpsc::Receiver<ChatEvent>) {
        ChatStream::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn send_appends_user_and_agent_turns_in_order() {
        let (mut chat, _rx) = stream_with(ScriptedTransport::new().with_reply("What is q1? [q1]"));

        let finalized = chat.send("hello", false, false).await.unwrap();

        assert_eq!(chat.history().len(), 2);
        let turns: Vec<_> = chat.history().iter().collect();
        assert!(turns[0].is_user());
        assert!(turns[1].is_agent());
        assert_eq!(finalized.turn.content(), "What is q1? [q1]");
    }

    #[tokio::test]
    async fn send_parses_the_marker_once() {
        let (mut chat, _rx) = stream_with(ScriptedTransport::new().with_reply("What is q1? [q1]"));

        let finalized = chat.send("hello", false, false).await.unwrap();

        let annotation = finalized.annotation.unwrap();
        assert_eq!(annotation.answered_field(), "q1");
    }

    #[tokio::test]
    async fn send_emits_deltas_then_finish() {
        let (mut chat, mut rx) = stream_with(ScriptedTransport::new().with_reply("Hi there [name]"));

        chat.send("hello", false, false).await.unwrap();

        let mut saw_delta = false;
        let mut saw_finish = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                ChatEvent::TurnDelta { .. } => saw_delta = true,
                ChatEvent::TurnFinished { turn } => {
                    assert_eq!(turn.content(), "Hi there [name]");
                    saw_finish = true;
                }
                ChatEvent::TurnFailed { .. } => panic!("round-trip should not fail"),
            }
        }
        assert!(saw_delta);
        assert!(saw_finish);
    }

    #[tokio::test]
    async fn mid_stream_failure_appends_no_agent_turn() {
        let (mut chat, mut rx) = stream_with(ScriptedTransport::new().with_failure("reset"));

        let result = chat.send("hello", false, false).await;

        assert!(matches!(result, Err(ChatStreamError::Transport(_))));
        // The user turn stays; no finalized agent turn exists.
        assert_eq!(chat.history().len(), 1);
        assert!(chat.history().last_agent_turn().is_none());

        let mut saw_failure = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ChatEvent::TurnFailed { .. }) {
                saw_failure = true;
            }
        }
        assert!(saw_failure);
    }

    #[tokio::test]
    async fn current_question_tracks_the_latest_agent_turn() {
        let (mut chat, _rx) = stream_with(
            ScriptedTransport::new()
                .with_reply("first? [a]")
                .with_reply("second? [b]"),
        );

        assert_eq!(chat.current_question(), "");
        chat.send("hello", false, false).await.unwrap();
        assert_eq!(chat.current_question(), "first? [a]");
        chat.send("answer", false, false).await.unwrap();
        assert_eq!(chat.current_question(), "second? [b]");
    }

    #[tokio::test]
    async fn reset_discards_history_and_input() {
        let (mut chat, _rx) = stream_with(ScriptedTransport::new().with_reply("q [a]"));
        chat.send("hello", false, false).await.unwrap();
        chat.set_input("half-typed answer");

        chat.reset();

        assert!(chat.history().is_empty());
        assert_eq!(chat.input(), "");
    }

    #[tokio::test]
    async fn rejects_empty_outgoing_content() {
        let (mut chat, _rx) = stream_with(ScriptedTransport::new());
        let result = chat.send("   ", false, false).await;
        assert!(matches!(result, Err(ChatStreamError::InvalidTurn(_))));
        assert!(chat.history().is_empty());
    }
}
