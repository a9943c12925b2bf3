//! Loop-local change detection and failure deduplication state

use serde_json::Value;

/// State carried from one poll iteration to the next
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollState {
    /// `date_updated` of the last record a notification was sent for
    pub last_notified_marker: Option<Value>,
    /// Last failure report sent to the chat
    pub last_failure_message: String,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `marker` differs from the last notified one
    pub fn is_new_marker(&self, marker: &Value) -> bool {
        self.last_notified_marker.as_ref() != Some(marker)
    }

    pub fn mark_notified(&mut self, marker: Value) {
        self.last_notified_marker = Some(marker);
    }

    /// Remember `message` as the last reported failure.
    ///
    /// Returns false when it repeats the previous report.
    pub fn record_failure(&mut self, message: &str) -> bool {
        if self.last_failure_message == message {
            return false;
        }
        self.last_failure_message = message.to_string();
        true
    }
}
