//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the conversation core to external systems:
//! - `chat` - chat transport implementations (HTTP streaming, scripted)
//! - `submission` - submission sinks (HTTP, in-memory)
//! - `notify` - submission notifiers (tracing, recording)

pub mod chat;
pub mod notify;
pub mod submission;

pub use chat::{HttpChatTransport, ScriptedReply, ScriptedTransport};
pub use notify::{RecordingNotifier, TracingNotifier};
pub use submission::{HttpSubmissionSink, InMemorySubmissionSink};
