//! Notifier trait for sending chat messages

use async_trait::async_trait;

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a text message
    async fn notify(&self, message: &str) -> crate::Result<()>;
}

/// Send `message`, logging instead of returning any delivery failure.
///
/// The chat is also the failure-reporting channel, so an outage there must
/// never abort the caller.
pub async fn deliver(notifier: &dyn Notifier, message: &str) {
    match notifier.notify(message).await {
        Ok(()) => tracing::debug!("Sent message via '{}': {}", notifier.type_name(), message),
        Err(e) => tracing::error!(
            "Failed to send message via '{}': {:?} ({}). Message was: {}",
            notifier.type_name(),
            e,
            e,
            message
        ),
    }
}
