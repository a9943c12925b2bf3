//! Homework bot - review status notification relay
//!
//! Polls the homework review API, detects status changes, and forwards them
//! to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod state;
pub mod telegram;
pub mod verdict;

pub use config::{load_config, Config, Credentials};
pub use error::{BotError, Result};

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::PollLoop;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::practicum::PracticumClient;
use crate::telegram::TelegramNotifier;

/// Assembles a [`Bot`] from configuration and credentials
pub struct BotBuilder {
    config: Config,
    credentials: Credentials,
    http: Option<Arc<dyn HttpClient>>,
}

impl BotBuilder {
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            http: None,
        }
    }

    /// Use `http` instead of a reqwest client for both endpoints
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<Bot> {
        if self.config.endpoint.is_empty() {
            return Err(BotError::Config("endpoint must not be empty".to_string()));
        }

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new()),
        };
        let cancel = CancellationToken::new();

        let fetcher = Arc::new(PracticumClient::new(
            &self.config.endpoint,
            &self.credentials.practicum_token,
            Arc::clone(&http),
        ));
        let notifier = Arc::new(TelegramNotifier::new(
            &self.config.telegram_api_url,
            &self.credentials.telegram_token,
            &self.credentials.telegram_chat_id,
            http,
        ));

        let from_date = chrono::Utc::now().timestamp();
        tracing::debug!("Polling for updates since {}", from_date);

        let poll_loop = PollLoop::new(
            fetcher,
            notifier,
            self.config.retry_period,
            from_date,
            cancel.clone(),
        );

        Ok(Bot { poll_loop, cancel })
    }
}

/// A configured bot ready to poll
pub struct Bot {
    poll_loop: PollLoop,
    cancel: CancellationToken,
}

impl Bot {
    /// Token that stops the poll loop at its next sleep
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until Ctrl-C or until the cancellation token is triggered
    pub async fn start(self) -> Result<()> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Poll until `shutdown` resolves successfully or the token is triggered.
    ///
    /// A `shutdown` future that fails leaves the loop running.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = std::io::Result<()>> + Send + 'static,
    {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match shutdown.await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!(
                    "Failed to listen for ctrl-c: {}. Polling continues until the process is killed.",
                    e
                ),
            }
        });

        tracing::info!("Homework bot started");
        self.poll_loop.run().await;
        tracing::info!("Homework bot stopped");

        Ok(())
    }
}
