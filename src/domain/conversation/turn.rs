//! Turn entity for conversations.
//!
//! Turns are immutable records of user/agent exchanges. Each turn has a
//! role, content, and timestamp; once created it is never modified.

use crate::domain::foundation::{DomainError, Timestamp, TurnId};
use serde::{Deserialize, Serialize};

/// Role of a turn's author in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Input typed by the person filling the form.
    User,
    /// A reply from the answering agent.
    Agent,
}

/// An immutable turn within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `content` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Unique identifier for this turn.
    id: TurnId,

    /// The role of the turn's author.
    role: Role,

    /// The content of the turn.
    content: String,

    /// When the turn was created.
    created_at: Timestamp,
}

impl Turn {
    /// Creates a new turn with the given role and content.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_id(TurnId::new(), role, content)
    }

    /// Creates a new turn with a caller-chosen id.
    ///
    /// Used when the id must be known before the content is finalized,
    /// e.g. while an agent reply is still streaming.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn with_id(id: TurnId, role: Role, content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Turn content cannot be empty",
            ));
        }

        Ok(Self {
            id,
            role,
            content,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a user turn.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn user(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::User, content)
    }

    /// Creates an agent turn.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn agent(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Role::Agent, content)
    }

    /// Returns the turn id.
    pub fn id(&self) -> &TurnId {
        &self.id
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the turn was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this turn was authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this turn was authored by the agent.
    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod role {
        use super::*;

        #[test]
        fn serializes_to_snake_case() {
            assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
            assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
        }

        #[test]
        fn deserializes_from_snake_case() {
            let role: Role = serde_json::from_str("\"agent\"").unwrap();
            assert_eq!(role, Role::Agent);
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn user_creates_user_turn() {
            let turn = Turn::user("Hello").unwrap();
            assert!(turn.is_user());
            assert!(!turn.is_agent());
            assert_eq!(turn.content(), "Hello");
        }

        #[test]
        fn agent_creates_agent_turn() {
            let turn = Turn::agent("What is your name? [name]").unwrap();
            assert!(turn.is_agent());
            assert_eq!(turn.role(), Role::Agent);
        }

        #[test]
        fn with_id_preserves_the_given_id() {
            let id = TurnId::new();
            let turn = Turn::with_id(id, Role::Agent, "Hi").unwrap();
            assert_eq!(turn.id(), &id);
        }

        #[test]
        fn rejects_empty_content() {
            assert!(Turn::user("").is_err());
        }

        #[test]
        fn rejects_whitespace_only_content() {
            assert!(Turn::agent("   \n").is_err());
        }

        #[test]
        fn sets_created_at() {
            let turn = Turn::user("Hello").unwrap();
            let now = Timestamp::now();
            assert!(!turn.created_at().is_after(&now));
        }
    }
}
