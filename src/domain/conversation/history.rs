//! Append-only turn history.
//!
//! The history is exclusively owned by the active session. Turns are only
//! ever appended in the order the transport finalizes them, never reordered
//! or deleted; restarting a session replaces the history with a fresh one.

use serde::{Deserialize, Serialize};

use super::Turn;

/// The ordered, append-only sequence of turns for one form-filling attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnHistory(Vec<Turn>);

impl TurnHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the history.
    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the turns as a slice, oldest first.
    pub fn as_slice(&self) -> &[Turn] {
        &self.0
    }

    /// Returns an owned copy of the turns, oldest first.
    ///
    /// Used to build wire payloads without exposing the history to mutation.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.0.clone()
    }

    /// Returns the most recent agent turn, if any.
    ///
    /// This is the question currently being answered.
    pub fn last_agent_turn(&self) -> Option<&Turn> {
        self.0.iter().rev().find(|t| t.is_agent())
    }

    /// Iterates over the turns, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.0.iter()
    }
}
