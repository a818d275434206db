//! Error types for project-init.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for the project-init library.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure while creating a directory or writing a file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The global tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// A log level name that is not one of the five known severities.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias for project-init.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = Error::io(
            "/tmp/locked/.env.defaults",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/locked/.env.defaults"));
        assert!(msg.contains("denied"));
    }
}
