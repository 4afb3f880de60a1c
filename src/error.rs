//! Error types for feed loading and page rendering

use thiserror::Error;

/// Result type alias for livetiles operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the feed or building the page
#[derive(Error, Debug)]
pub enum Error {
    /// The feed request failed or returned a non-success status
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The feed body was not a valid feed document
    #[error("Failed to parse feed: {0}")]
    FeedParseError(String),

    /// A live entry references a member key that is absent from the feed
    #[error("Live entry references unknown member '{0}'")]
    MissingMember(String),

    /// Failed to build or attach a node
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error (feed files, output files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error belongs to the "fetch failed" class, which the page
    /// controller swallows and logs instead of propagating.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::NetworkError(_) | Error::FeedParseError(_) | Error::Io(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::FeedParseError(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}
