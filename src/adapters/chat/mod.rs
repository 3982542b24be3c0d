//! Chat transport adapters.

mod http;
mod scripted;

pub use http::HttpChatTransport;
pub use scripted::{ScriptedReply, ScriptedTransport};
