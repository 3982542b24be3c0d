//! Session state snapshot and its transitions.
//!
//! The session state is an immutable snapshot; every transition is a pure
//! function returning a new snapshot, so handlers never perform partial
//! field updates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};

use super::Stage;

/// Fixed greeting sent through the chat stream when the session begins,
/// prompting the agent to ask the first question.
pub const FORM_FILL_GREETING: &str = "hello, i want to fill the form";

/// Snapshot of one form-filling session's progress.
///
/// # Invariants
///
/// - `stage` only advances welcome -> fields -> end; forward transitions
///   are idempotent and the stage never regresses within a session.
/// - `submitted` flips to true at most once per session; it is the one-shot
///   guard that keeps redundant completion signals from re-submitting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    stage: Stage,
    last_answered_index: Option<usize>,
    current_field: Option<String>,
    submitted: bool,
}

impl SessionState {
    /// Creates the initial state: welcome stage, no progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the index of the last field a marked agent turn resolved to,
    /// or `None` if no turn resolved yet (or the marker was unknown).
    pub fn last_answered_index(&self) -> Option<usize> {
        self.last_answered_index
    }

    /// Returns the identifier carried by the most recent marked agent turn.
    pub fn current_field(&self) -> Option<&str> {
        self.current_field.as_deref()
    }

    /// Returns true once the completion sequence has fired.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Starts the dialogue: welcome -> fields.
    ///
    /// Re-invoking from the fields stage is a no-op; the session never
    /// moves from welcome directly to end.
    ///
    /// # Errors
    ///
    /// - `InvalidStageTransition` if the session has already ended
    pub fn begin(&self) -> Result<Self, DomainError> {
        self.advance(Stage::Fields)
    }

    /// Records the field a finalized agent turn pertains to.
    ///
    /// An unresolved identifier (no matching descriptor) is recorded with
    /// `index = None`; this is deliberately not an error.
    pub fn record_answer(&self, identifier: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            last_answered_index: index,
            current_field: Some(identifier.into()),
            ..self.clone()
        }
    }

    /// Marks the session as submitted, ahead of the persistence write.
    pub fn mark_submitted(&self) -> Self {
        Self {
            submitted: true,
            ..self.clone()
        }
    }

    /// Ends the dialogue: fields -> end. Idempotent.
    ///
    /// # Errors
    ///
    /// - `InvalidStageTransition` if invoked from the welcome stage
    pub fn complete(&self) -> Result<Self, DomainError> {
        self.advance(Stage::End)
    }

    /// Restarts the session: any stage -> welcome, all progress cleared.
    pub fn reset(&self) -> Self {
        Self::new()
    }

    fn advance(&self, target: Stage) -> Result<Self, DomainError> {
        if self.stage == target {
            return Ok(self.clone());
        }
        let stage = self
            .stage
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStageTransition, e.to_string()))?;
        Ok(Self {
            stage,
            ..self.clone()
        })
    }
}
