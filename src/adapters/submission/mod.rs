//! Submission sink adapters.

mod http;
mod in_memory;

pub use http::HttpSubmissionSink;
pub use in_memory::InMemorySubmissionSink;
