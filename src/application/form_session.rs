//! Form session - the conversation orchestrator.
//!
//! Ties the pieces together for one form-filling attempt: the stage state
//! machine, the chat stream, the field progress tracker, the completion
//! detector, and the submission manager. All work runs as reactions to
//! discrete events; at most one chat round-trip and, independently, at
//! most one submission may be outstanding at a time.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::conversation::{
    SessionState, Stage, Turn, TurnAnnotation, TurnHistory, FORM_FILL_GREETING,
};
use crate::domain::form::FormDefinition;
use crate::domain::foundation::{DomainError, FlightSlot};
use crate::ports::{ChatTransport, SubmissionNotifier, SubmissionSink};

use super::chat_stream::{ChatEvent, ChatStream, ChatStreamError, FinalizedTurn};
use super::submission::{SubmissionManager, SubmitError};

/// Outcome of an attempted answer send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// A chat round-trip was already outstanding; the send was a no-op.
    Ignored,
    /// The answer was delivered and the agent's reply finalized.
    Delivered,
}

/// Errors surfaced by the form session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Answers are only accepted while the session is in the fields stage.
    #[error("answers are not accepted in the {stage} stage")]
    NotAcceptingAnswers {
        /// The stage the session was in.
        stage: Stage,
    },

    /// The answer was empty or whitespace only.
    #[error("answer cannot be empty")]
    EmptyAnswer,

    /// The chat round-trip failed.
    #[error(transparent)]
    Chat(#[from] ChatStreamError),

    /// A stage transition was invalid.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Orchestrator for one form-filling session.
///
/// # Invariants
///
/// - The stage only advances welcome -> fields -> end within a session.
/// - The completion sequence (commit + stage end) fires at most once per
///   session, guarded by the `submitted` flag.
/// - A second answer send while a round-trip is outstanding is ignored,
///   never queued.
pub struct FormSession<T, S, N>
where
    T: ChatTransport,
    S: SubmissionSink,
    N: SubmissionNotifier,
{
    form: FormDefinition,
    chat: ChatStream<T>,
    submissions: SubmissionManager<S, N>,
    state: SessionState,
    chat_flight: FlightSlot,
    is_preview: bool,
}

impl<T, S, N> FormSession<T, S, N>
where
    T: ChatTransport,
    S: SubmissionSink,
    N: SubmissionNotifier,
{
    /// Creates a session for the given form and the receiver for its chat
    /// events.
    pub fn new(
        form: FormDefinition,
        transport: Arc<T>,
        sink: Arc<S>,
        notifier: Arc<N>,
        is_preview: bool,
    ) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (chat, events) = ChatStream::new(transport);
        (
            Self {
                form,
                chat,
                submissions: SubmissionManager::new(sink, notifier),
                state: SessionState::new(),
                chat_flight: FlightSlot::new(),
                is_preview,
            },
            events,
        )
    }

    /// Returns the form definition this session fills.
    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    /// Returns the current stage.
    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Returns the full session state snapshot.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the turn history, oldest first.
    pub fn history(&self) -> &TurnHistory {
        self.chat.history()
    }

    /// Returns the question currently being answered, or "" before the
    /// first agent turn.
    pub fn current_question(&self) -> &str {
        self.chat.current_question()
    }

    /// Returns true while a chat round-trip is outstanding.
    pub fn is_chat_busy(&self) -> bool {
        self.chat_flight.is_occupied()
    }

    /// Returns true while a submission write is outstanding.
    pub fn is_submission_busy(&self) -> bool {
        self.submissions.is_busy()
    }

    /// Returns true while either round-trip is outstanding.
    pub fn is_busy(&self) -> bool {
        self.is_chat_busy() || self.is_submission_busy()
    }

    /// Returns true if a failed commit is stored and can be retried.
    pub fn has_failed_submission(&self) -> bool {
        self.submissions.has_failed_submission()
    }

    /// Returns the pending-input buffer.
    pub fn input(&self) -> &str {
        self.chat.input()
    }

    /// Replaces the pending-input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.chat.set_input(text);
    }

    /// Starts the dialogue: welcome -> fields, then sends the fixed
    /// greeting to prompt the first question.
    ///
    /// Calling `begin` again after the session has started is a no-op, so
    /// exactly one greeting is ever sent.
    ///
    /// # Errors
    ///
    /// - `Domain` if the session already ended
    /// - `Chat` if the greeting round-trip fails; retrying the greeting is
    ///   the caller's responsibility
    pub async fn begin(&mut self) -> Result<(), SessionError> {
        if self.state.stage() != Stage::Welcome {
            tracing::debug!(stage = %self.state.stage(), "begin ignored; session already started");
            return Ok(());
        }
        self.state = self.state.begin()?;
        tracing::info!(form_id = %self.form.id(), "session started");

        self.round_trip(FORM_FILL_GREETING).await?;
        Ok(())
    }

    /// Sends one user answer and processes the agent's reply.
    ///
    /// Returns [`AnswerOutcome::Ignored`] when a round-trip is already
    /// outstanding; the answer is dropped, not queued.
    ///
    /// # Errors
    ///
    /// - `EmptyAnswer` if the content is empty or whitespace only
    /// - `NotAcceptingAnswers` outside the fields stage
    /// - `Chat` if the round-trip fails
    pub async fn submit_answer(
        &mut self,
        content: impl Into<String>,
    ) -> Result<AnswerOutcome, SessionError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        if !self.state.stage().accepts_answers() {
            return Err(SessionError::NotAcceptingAnswers {
                stage: self.state.stage(),
            });
        }
        self.round_trip(&content).await
    }

    /// Sends the pending-input buffer as the answer.
    ///
    /// The buffer is cleared only when the answer was actually delivered;
    /// an ignored send leaves it intact for the next attempt.
    pub async fn submit_input(&mut self) -> Result<AnswerOutcome, SessionError> {
        let content = self.chat.input().to_string();
        match self.submit_answer(content).await? {
            AnswerOutcome::Delivered => {
                self.chat.clear_input();
                Ok(AnswerOutcome::Delivered)
            }
            AnswerOutcome::Ignored => Ok(AnswerOutcome::Ignored),
        }
    }

    /// Feeds a finalized agent turn through the progress tracker and
    /// completion detector.
    ///
    /// Round-trips run this internally; it is public so a caller wiring
    /// its own transport events can drive the same logic.
    pub async fn observe_agent_turn(&mut self, turn: &Turn) -> Result<(), SessionError> {
        let finalized = FinalizedTurn {
            turn: turn.clone(),
            annotation: TurnAnnotation::parse(turn.content()),
        };
        self.apply(&finalized).await
    }

    /// Re-attempts the stored failed commit with the identical payload.
    pub async fn retry_submission(&mut self) -> Result<(), SubmitError> {
        self.submissions.retry().await
    }

    /// Restarts the session: back to the welcome stage with a fresh
    /// history, cleared progress, and no stored retry.
    pub fn reset(&mut self) {
        tracing::info!(form_id = %self.form.id(), "session reset");
        self.state = self.state.reset();
        self.chat.reset();
        self.submissions.reset();
    }

    async fn round_trip(&mut self, content: &str) -> Result<AnswerOutcome, SessionError> {
        let Some(_flight) = self.chat_flight.try_acquire() else {
            tracing::debug!("chat round-trip already outstanding; send ignored");
            return Ok(AnswerOutcome::Ignored);
        };

        let finalized = self
            .chat
            .send(content, self.state.is_submitted(), self.is_preview)
            .await?;
        drop(_flight);

        self.apply(&finalized).await?;
        Ok(AnswerOutcome::Delivered)
    }

    async fn apply(&mut self, finalized: &FinalizedTurn) -> Result<(), SessionError> {
        let Some(annotation) = finalized.annotation.as_ref() else {
            // Parse miss: the turn is small talk, not field-advancing.
            tracing::debug!("agent turn carried no field marker; progress unchanged");
            return Ok(());
        };

        let identifier = annotation.answered_field();
        let index = self.form.fields().index_of(identifier);
        if index.is_none() && !annotation.signals_completion() {
            // Unknown markers are tolerated; the agent owns the dialogue.
            tracing::debug!(field = identifier, "marker does not match a known field");
        }
        self.state = self.state.record_answer(identifier, index);

        if annotation.signals_completion() && !self.state.is_submitted() {
            self.state = self.state.mark_submitted();
            tracing::info!(form_id = %self.form.id(), "completion sentinel detected; committing");

            // The stage moves to end whether or not the write succeeds;
            // a failed write leaves a stored retry command behind.
            if let Err(err) = self
                .submissions
                .commit(*self.form.id(), self.chat.history(), self.is_preview)
                .await
            {
                tracing::warn!(error = %err, "commit failed; manual retry available");
            }
            self.state = self.state.complete()?;
        }
        Ok(())
    }
}
