//! Submission manager - commit with user-triggered retry.
//!
//! Packages the full turn history plus a synthetic closing turn and writes
//! it to the persistence collaborator. A failed commit stores the exact
//! command so a manual retry re-issues an identical payload; nothing is
//! queued or retried automatically. A single-slot in-flight token keeps
//! two submissions from ever running concurrently.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::{Turn, TurnHistory, COMPLETION_SENTINEL};
use crate::domain::foundation::{FlightSlot, FormId};
use crate::ports::{
    SubmissionError, SubmissionNotice, SubmissionNotifier, SubmissionRequest, SubmissionSink,
};

/// Errors surfaced by the submission manager.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A submission round-trip is already outstanding.
    #[error("a submission is already in flight")]
    AlreadyInFlight,

    /// Retry was requested but no failed submission is stored.
    #[error("no failed submission to retry")]
    NothingToRetry,

    /// The persistence collaborator rejected or failed the write.
    #[error(transparent)]
    Sink(#[from] SubmissionError),
}

/// The stored commit command: payload construction happens once, and a
/// retry re-invokes the identical command regardless of how the original
/// attempt failed.
#[derive(Debug, Clone)]
pub struct CommitCommand {
    form_id: FormId,
    request: SubmissionRequest,
}

impl CommitCommand {
    /// Builds the command: full history plus the synthetic closing turn.
    pub fn new(form_id: FormId, history: &TurnHistory, is_preview: bool) -> Self {
        let mut messages = history.snapshot();
        messages.push(closing_turn());
        Self {
            form_id,
            request: SubmissionRequest::new(messages, is_preview),
        }
    }

    /// Returns the target form id.
    pub fn form_id(&self) -> &FormId {
        &self.form_id
    }

    /// Returns the payload to persist.
    pub fn request(&self) -> &SubmissionRequest {
        &self.request
    }
}

/// The synthetic user turn appended to every submission payload.
fn closing_turn() -> Turn {
    Turn::user(COMPLETION_SENTINEL).expect("sentinel content is non-empty")
}

/// Coordinates commit attempts against the submission sink.
pub struct SubmissionManager<S: SubmissionSink, N: SubmissionNotifier> {
    sink: Arc<S>,
    notifier: Arc<N>,
    slot: FlightSlot,
    last_failed: Option<CommitCommand>,
}

impl<S: SubmissionSink, N: SubmissionNotifier> SubmissionManager<S, N> {
    /// Creates a manager over the given sink and notifier.
    pub fn new(sink: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            sink,
            notifier,
            slot: FlightSlot::new(),
            last_failed: None,
        }
    }

    /// Returns true while a commit write is outstanding.
    pub fn is_busy(&self) -> bool {
        self.slot.is_occupied()
    }

    /// Returns true if a failed commit is stored and can be retried.
    pub fn has_failed_submission(&self) -> bool {
        self.last_failed.is_some()
    }

    /// Commits the dialogue: history plus synthetic closing turn.
    ///
    /// # Errors
    ///
    /// - `AlreadyInFlight` if a commit is outstanding
    /// - `Sink` if the write fails; the command is stored for retry
    pub async fn commit(
        &mut self,
        form_id: FormId,
        history: &TurnHistory,
        is_preview: bool,
    ) -> Result<(), SubmitError> {
        self.execute(CommitCommand::new(form_id, history, is_preview))
            .await
    }

    /// Re-attempts the stored failed commit with the identical payload.
    ///
    /// # Errors
    ///
    /// - `NothingToRetry` if no failed commit is stored
    /// - `AlreadyInFlight` if a commit is outstanding
    /// - `Sink` if the write fails again
    pub async fn retry(&mut self) -> Result<(), SubmitError> {
        let command = self.last_failed.clone().ok_or(SubmitError::NothingToRetry)?;
        self.execute(command).await
    }

    /// Forgets any stored failed commit. Used when the session restarts.
    pub fn reset(&mut self) {
        self.last_failed = None;
    }

    async fn execute(&mut self, command: CommitCommand) -> Result<(), SubmitError> {
        let Some(_flight) = self.slot.try_acquire() else {
            return Err(SubmitError::AlreadyInFlight);
        };

        self.notifier.notify(SubmissionNotice::InProgress);
        match self.sink.persist(command.form_id(), command.request()).await {
            Ok(()) => {
                tracing::info!(form_id = %command.form_id(), "dialogue committed");
                self.last_failed = None;
                self.notifier.notify(SubmissionNotice::Succeeded);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(form_id = %command.form_id(), error = %err, "commit failed");
                self.last_failed = Some(command);
                self.notifier.notify(SubmissionNotice::Failed {
                    retry_available: true,
                });
                Err(err.into())
            }
        }
    }
}
