//! Conversation stage state machine.
//!
//! Defines the coarse phases of a form-filling session and valid
//! transitions between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The coarse phase of a form-filling session.
///
/// Sessions move forward only:
/// - `Welcome`: the form's welcome copy is shown, no dialogue yet
/// - `Fields`: active question-and-answer dialogue
/// - `End`: dialogue complete, answers committed, read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Initial stage, before the greeting has been sent.
    #[default]
    Welcome,

    /// Active dialogue; the agent asks questions and the user answers.
    Fields,

    /// Terminal stage for this session instance.
    End,
}

impl Stage {
    /// Returns true if user answers are accepted in this stage.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::Fields)
    }

    /// Returns a short label for the stage, suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Fields => "fields",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Stage::*;
        // Forward only; never Welcome -> End directly.
        matches!((self, target), (Welcome, Fields) | (Fields, End))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            Welcome => vec![Fields],
            Fields => vec![End],
            End => vec![],
        }
    }
}
