//! Error types for the homework bot

/// Errors that can occur in the homework bot
///
/// `Config` is fatal and only produced at startup. Everything else is
/// contained within a single poll iteration.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected API response: {0}")]
    Shape(String),

    #[error("Missing field in homework record: {0}")]
    MissingField(&'static str),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Endpoint error: {0}")]
    Endpoint(String),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
