//! Poll loop: fetch, validate, compare and notify

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::notifier::{deliver, Notifier};
use crate::practicum::Fetcher;
use crate::response::{parse_status, status_marker, validate_response};
use crate::state::PollState;

/// Prefix of the failure report sent to the chat
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single poll iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A status change notification was handed to the notifier
    Notified(String),
    /// The newest record carries the already notified marker
    Unchanged,
    /// The iteration failed; `reported` is false when the report was a repeat
    Failed { message: String, reported: bool },
}

/// Polls the homework API and relays status changes to the notifier
pub struct PollLoop {
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    from_date: i64,
    state: PollState,
    cancel: CancellationToken,
}

impl std::fmt::Debug for PollLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollLoop")
            .field("notifier", &self.notifier)
            .field("retry_period", &self.retry_period)
            .field("from_date", &self.from_date)
            .field("state", &self.state)
            .finish()
    }
}

impl PollLoop {
    /// `from_date` stays fixed for the lifetime of the loop.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        from_date: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            retry_period,
            from_date,
            state: PollState::new(),
            cancel,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Run iterations until the cancellation token is triggered.
    ///
    /// Cancellation is only observed while sleeping between iterations.
    pub async fn run(&mut self) {
        loop {
            let outcome = self.poll_once().await;
            tracing::debug!("Poll iteration finished: {:?}", outcome);

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.retry_period) => {}
            }
        }
    }

    /// Run one iteration without the trailing sleep
    pub async fn poll_once(&mut self) -> Outcome {
        match self.check_for_update().await {
            Ok(Some(message)) => Outcome::Notified(message),
            Ok(None) => Outcome::Unchanged,
            Err(e) => {
                tracing::error!("Poll iteration failed: {:?}", e);
                let message = format!("{}: {}", FAILURE_PREFIX, e);
                let reported = self.state.record_failure(&message);
                if reported {
                    deliver(self.notifier.as_ref(), &message).await;
                } else {
                    tracing::debug!("Suppressing repeated failure report");
                }
                Outcome::Failed { message, reported }
            }
        }
    }

    async fn check_for_update(&mut self) -> crate::Result<Option<String>> {
        let response = self.fetcher.fetch(self.from_date).await?;
        let homeworks = validate_response(response)?;

        // Only the newest record is inspected.
        let record = &homeworks[0];
        let marker = status_marker(record);
        if !self.state.is_new_marker(&marker) {
            tracing::debug!("Homework status has not changed");
            return Ok(None);
        }

        let message = parse_status(record)?;
        deliver(self.notifier.as_ref(), &message).await;
        self.state.mark_notified(marker);
        Ok(Some(message))
    }
}
