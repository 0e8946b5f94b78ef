//! Reconcile Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A reconcile error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reconcile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a reconcile failure.
///
/// ### Fatal
/// - [`ErrorKind::Precondition`] - the run never started, nothing was touched.
/// - [`ErrorKind::Filesystem`]
/// - [`ErrorKind::Library`]
///
/// ### Local to one subfolder
/// - [`ErrorKind::BinCreation`]
/// - [`ErrorKind::Import`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Input checks failed before any work was done.
    #[display("{_0}")]
    Precondition(#[error(not(source))] Precondition),
    /// Listing the footage folders failed.
    #[display("could not read footage folder")]
    Filesystem,
    /// A media library call failed unexpectedly.
    #[display("media library call failed")]
    Library,
    /// The library refused to create the named bin.
    #[display("failed to create bin: {_0}")]
    BinCreation(#[error(not(source))] String),
    /// The library rejected an import request destined for the named bin.
    #[display("failed to import media for bin: {_0}")]
    Import(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if the failure only affects a single subfolder and the
    /// run can carry on with the next one.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::BinCreation(_) | Self::Import(_))
    }
}

/// Reasons a run refuses to start.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[display("please select a folder first")]
    NoFolder,
    #[display("folder not found: {}", _0.display())]
    FolderMissing(PathBuf),
    #[display("not connected to the media library")]
    LibraryUnavailable,
    #[display("no subfolders found in: {}", _0.display())]
    NoSubfolders(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Precondition(Precondition::FolderMissing(PathBuf::from("/shoot"))).to_string(),
            "folder not found: /shoot"
        );
        assert_eq!(ErrorKind::BinCreation("2024-11-22 - A".into()).to_string(), "failed to create bin: 2024-11-22 - A");
    }

    #[test]
    fn error_kind_local() {
        assert!(ErrorKind::Import("x".into()).is_local());
        assert!(ErrorKind::BinCreation("x".into()).is_local());
        assert!(!ErrorKind::Library.is_local());
        assert!(!ErrorKind::Precondition(Precondition::NoFolder).is_local());
    }
}
