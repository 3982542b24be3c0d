//! Notification port - Submission progress surfaced to the user.
//!
//! The core emits exactly three notices around a commit; how they are
//! rendered (toasts, banners, logs) is the presentation layer's concern.

use serde::Serialize;

/// A user-facing submission notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionNotice {
    /// The commit write has started.
    InProgress,
    /// The answers were persisted.
    Succeeded,
    /// The write failed; a manual retry may be offered.
    Failed {
        /// True when a stored retry command is available.
        retry_available: bool,
    },
}

/// Port for delivering submission notices to the presentation layer.
pub trait SubmissionNotifier: Send + Sync {
    /// Delivers one notice. Must not block.
    fn notify(&self, notice: SubmissionNotice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_serialize_with_a_kind_tag() {
        let json = serde_json::to_value(SubmissionNotice::Failed {
            retry_available: true,
        })
        .unwrap();
        assert_eq!(json["kind"], "failed");
        assert_eq!(json["retry_available"], true);

        let json = serde_json::to_value(SubmissionNotice::InProgress).unwrap();
        assert_eq!(json["kind"], "in_progress");
    }
}
