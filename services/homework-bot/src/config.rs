//! Configuration types for the homework bot

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the homework API token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Non-secret settings, optionally loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default = "default_retry_period", with = "humantime_serde")]
    pub retry_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_period: default_retry_period(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> Duration {
    Duration::from_secs(600)
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Secrets the bot needs before it may start polling
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment, falling back to the
    /// dotenv file at `path` when it exists
    pub fn from_env_and_file(path: &Path) -> crate::Result<Self> {
        Self::from_file_and_lookup(path, |name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, falling back to the dotenv file at
    /// `path` for names `lookup` leaves unset or empty. A missing file is not
    /// an error.
    pub fn from_file_and_lookup<F>(path: &Path, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = read_env_file(path)?;
        Self::from_lookup(|name| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .or_else(|| file.get(name).cloned())
        })
    }

    /// Read credentials through `lookup`; unset and empty values are both missing
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name).filter(|value| !value.is_empty()).ok_or_else(|| {
                tracing::error!(
                    "Missing required environment variable {}. Refusing to start.",
                    name
                );
                crate::BotError::Config(format!(
                    "missing required environment variable {}",
                    name
                ))
            })
        };

        Ok(Self {
            practicum_token: require(PRACTICUM_TOKEN_VAR)?,
            telegram_token: require(TELEGRAM_TOKEN_VAR)?,
            telegram_chat_id: require(TELEGRAM_CHAT_ID_VAR)?,
        })
    }
}

fn read_env_file(path: &Path) -> crate::Result<HashMap<String, String>> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => {
            tracing::debug!("No env file at {:?}", path);
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(crate::BotError::Config(format!(
                "Failed to read env file {:?}: {}",
                path, e
            )))
        }
    };

    let vars = entries
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| {
            crate::BotError::Config(format!("Failed to parse env file {:?}: {}", path, e))
        })?;
    tracing::debug!("Loaded {} variables from {:?}", vars.len(), path);
    Ok(vars)
}
