//! Error handling for the VMS motion agent.

use reqwest::StatusCode;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Retry budget exhausted on connection failures, timeouts or 429s
    #[error("retry limit exceeded after {attempts} attempts: {url}")]
    RetryLimitExceeded { url: String, attempts: u32 },

    /// Non-2xx response other than 429; never retried
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// Enum discovery did not yield both motion event codes
    #[error("VMS schema unsupported: {0}")]
    UnsupportedSchema(String),

    /// Second motion start while an episode was still open
    #[error("double motion start at tick {tick}")]
    DoubleStart { tick: i64 },

    /// Integration boundary that has no backend wired up
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
