//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Colloquy domain.

mod errors;
mod flight;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use flight::{FlightGuard, FlightSlot};
pub use ids::{FormId, TurnId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
