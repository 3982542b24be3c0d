//! Submission notifier adapters.

use std::sync::{Arc, Mutex};

use crate::ports::{SubmissionNotice, SubmissionNotifier};

/// Notifier that logs notices through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a tracing-backed notifier.
    pub fn new() -> Self {
        Self
    }
}

impl SubmissionNotifier for TracingNotifier {
    fn notify(&self, notice: SubmissionNotice) {
        match notice {
            SubmissionNotice::InProgress => tracing::info!("saving form details"),
            SubmissionNotice::Succeeded => tracing::info!("form details saved"),
            SubmissionNotice::Failed { retry_available } => {
                tracing::warn!(retry_available, "unable to save form details")
            }
        }
    }
}

/// Notifier that records notices for verification in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<SubmissionNotice>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notices delivered so far, in order.
    pub fn notices(&self) -> Vec<SubmissionNotice> {
        self.notices.lock().unwrap().clone()
    }
}

impl SubmissionNotifier for RecordingNotifier {
    fn notify(&self, notice: SubmissionNotice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_preserves_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(SubmissionNotice::InProgress);
        notifier.notify(SubmissionNotice::Succeeded);

        assert_eq!(
            notifier.notices(),
            vec![SubmissionNotice::InProgress, SubmissionNotice::Succeeded]
        );
    }

    #[test]
    fn tracing_notifier_accepts_all_notices() {
        let notifier = TracingNotifier::new();
        notifier.notify(SubmissionNotice::InProgress);
        notifier.notify(SubmissionNotice::Succeeded);
        notifier.notify(SubmissionNotice::Failed {
            retry_available: true,
        });
    }
}
