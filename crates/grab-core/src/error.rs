//! Error type for a single download.
//!
//! Every variant aborts only the URL it belongs to; the batch runner prints it
//! as one line and moves on.

use std::io;
use std::path::PathBuf;

/// Failure of one download, from request through the last chunk.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// No response was received (bad URL, DNS, connect, TLS, ...).
    #[error("{url}: {source}")]
    Transport {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A response arrived but its status was not 200.
    #[error("{url}: {status}")]
    HttpStatus { url: String, status: String },

    #[error("`{filename}` - invalid Content-Length `{value}`: {source}")]
    MalformedLength {
        filename: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("`{filename}` - server did not send a Content-Length")]
    MissingLength { filename: String },

    #[error("cannot create {}: {source}", path.display())]
    FileOpen { path: PathBuf, source: io::Error },

    /// Read or write failure inside the chunk loop. Partial output stays on disk.
    #[error("`{target}` - transfer failed: {source}")]
    Io { target: String, source: io::Error },
}

/// Coarse classification of a [`DownloadError`], used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    MalformedLength,
    MissingLength,
    FileOpen,
    Io,
}

impl DownloadError {
    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        DownloadError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn io(target: &str, source: io::Error) -> Self {
        DownloadError::Io {
            target: target.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::Transport { .. } => ErrorKind::Transport,
            DownloadError::HttpStatus { .. } => ErrorKind::HttpStatus,
            DownloadError::MalformedLength { .. } => ErrorKind::MalformedLength,
            DownloadError::MissingLength { .. } => ErrorKind::MissingLength,
            DownloadError::FileOpen { .. } => ErrorKind::FileOpen,
            DownloadError::Io { .. } => ErrorKind::Io,
        }
    }
}
