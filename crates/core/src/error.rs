//! Error types for blobup-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for blobup-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for blobup-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Storage service request failed
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk failed on an entry
    #[error("failed to read {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A single file failed to upload
    #[error("failed to upload {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the local path that was being uploaded
    pub fn upload(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Upload {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,                // UsageError
            Error::Network(_) => 3,               // NetworkError
            Error::Auth(_) => 4,                  // AuthError
            Error::Upload { source, .. } => source.exit_code(),
            _ => 1,                               // GeneralError
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        Error::Traversal { path, source: err }
    }
}
