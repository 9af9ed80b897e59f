//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Convenience alias used throughout the crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by path translation, configuration, and store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The path cannot be mapped onto a bucket/key shape.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}: no such file or directory")]
    NotFound(String),

    /// Non-recursive removal of a directory that still has entries.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout")
                    || msg.contains("connection reset")
                    || msg.contains("connection refused")
                    || msg.contains("503")
                    || msg.contains("service unavailable")
                    || msg.contains("429")
                    || msg.contains("too many requests")
                    || msg.contains("slow down")
            }
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            ),
            Error::InvalidPath(_)
            | Error::NotFound(_)
            | Error::DirectoryNotEmpty(_)
            | Error::Auth(_)
            | Error::Config(_) => false,
            Error::General(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout") || msg.contains("temporary")
            }
        }
    }
}
