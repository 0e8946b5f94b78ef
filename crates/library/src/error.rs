//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::models::BinId;
use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A media library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for media library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The host application (or its library document) cannot be reached.
    #[display("media library unavailable")]
    Unavailable,
    /// A bin handle no longer refers to a bin in the library.
    #[display("bin not found: {_0}")]
    NotFound(#[error(not(source))] BinId),
    /// A sibling bin with the same name already exists.
    #[display("bin already exists: {_0}")]
    AlreadyExists(#[error(not(source))] String),
    /// The library declined to create a bin for any other reason.
    #[display("bin creation refused: {_0}")]
    Refused(#[error(not(source))] String),
    /// A bulk import request failed as a whole; nothing was imported.
    #[display("media import rejected")]
    ImportRejected,
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// The persisted library document could not be parsed or written.
    #[display("library document error")]
    Document,
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::AlreadyExists("2024-11-22 - A".into()).to_string(), "bin already exists: 2024-11-22 - A");
        assert_eq!(ErrorKind::NotFound(BinId::new(7)).to_string(), "bin not found: #7");
        assert_eq!(ErrorKind::ImportRejected.to_string(), "media import rejected");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Unavailable.is_retryable());
        assert!(!ErrorKind::ImportRejected.is_retryable());
        assert!(!ErrorKind::Refused("x".into()).is_retryable());
    }
}
