use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Unreadable file {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("Failed to remove {}: {source}", path.display())]
    RemovalFailed { path: PathBuf, source: io::Error },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Index error: {0}")]
    Index(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub fn removal_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::RemovalFailed {
            path: path.into(),
            source,
        }
    }
}
