//! Application layer - Session orchestration.
//!
//! Coordinates the domain with the chat transport, submission sink, and
//! notifier ports: one chat round-trip at a time, progress tracked after
//! every finalized agent turn, and a one-shot commit once the completion
//! sentinel appears.

pub mod chat_stream;
pub mod form_session;
pub mod submission;

pub use chat_stream::{ChatEvent, ChatStream, ChatStreamError, FinalizedTurn};
pub use form_session::{AnswerOutcome, FormSession, SessionError};
pub use submission::{CommitCommand, SubmissionManager, SubmitError};
