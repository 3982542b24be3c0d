//! In-Memory Submission Sink
//!
//! Records submissions in memory with optional failure injection.
//! Useful for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::FormId;
use crate::ports::{SubmissionError, SubmissionRequest, SubmissionSink};

/// In-memory sink recording every accepted submission.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubmissionSink {
    received: Arc<RwLock<Vec<(FormId, SubmissionRequest)>>>,
    failures_remaining: Arc<AtomicU32>,
}

impl InMemorySubmissionSink {
    /// Create a new in-memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` persist calls fail with a network error.
    pub fn fail_times(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Get the number of accepted submissions
    pub async fn submission_count(&self) -> usize {
        self.received.read().await.len()
    }

    /// Returns the most recently accepted submission, if any.
    pub async fn last_submission(&self) -> Option<(FormId, SubmissionRequest)> {
        self.received.read().await.last().cloned()
    }

    /// Clear all recorded submissions (useful for tests)
    pub async fn clear(&self) {
        self.received.write().await.clear();
    }
}

#[async_trait]
impl SubmissionSink for InMemorySubmissionSink {
    async fn persist(
        &self,
        form_id: &FormId,
        request: &SubmissionRequest,
    ) -> Result<(), SubmissionError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(SubmissionError::network("injected failure"));
        }

        self.received.write().await.push((*form_id, request.clone()));
        Ok(())
    }
}
