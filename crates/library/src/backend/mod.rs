//! Media library trait and implementations.
//!
//! This module defines the [`MediaLibrary`] trait, the narrow contract through
//! which the reconcile engine talks to the host editing application's media
//! pool. Everything the engine knows about bins and clips comes from these
//! calls; nothing is cached by the implementations on the engine's behalf.

mod file;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod ro;

pub use self::file::FileLibrary;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockLibrary;
pub use self::ro::ReadOnlyLibrary;
use crate::error::Result;
use crate::models::{Bin, Clip};
use std::path::PathBuf;

/// Unified interface for host media libraries.
///
/// All operations are blocking calls against a stateful, singleton
/// collaborator. Methods take `&self`; implementations provide their own
/// interior mutability.
///
/// # Examples
///
/// ```
/// use reel_library::{Bin, MediaLibrary, error::Result};
///
/// fn count_top_level_clips(library: &dyn MediaLibrary) -> Result<usize> {
///     let root = library.root_bin()?;
///     let mut total = library.list_clips(&root)?.len();
///     for bin in library.list_subbins(&root)? {
///         total += library.list_clips(&bin)?.len();
///     }
///     Ok(total)
/// }
/// ```
pub trait MediaLibrary: Send + Sync {
    /// Name of the library, used for logging only.
    fn name(&self) -> &str;

    /// The distinguished root bin. Fails with
    /// [`Unavailable`](crate::error::ErrorKind::Unavailable) when the host
    /// cannot be reached.
    fn root_bin(&self) -> Result<Bin>;

    /// Create a bin named `name` directly under `parent`.
    ///
    /// Returns [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) or
    /// [`Refused`](crate::error::ErrorKind::Refused) when the host declines.
    fn add_subfolder(&self, parent: &Bin, name: &str) -> Result<Bin>;

    /// Direct children of `bin`, in the host's listing order.
    fn list_subbins(&self, bin: &Bin) -> Result<Vec<Bin>>;

    /// Clips directly inside `bin`.
    fn list_clips(&self, bin: &Bin) -> Result<Vec<Clip>>;

    /// Import media files. New clips always land in the root bin.
    ///
    /// A request the host rejects as a whole is reported as
    /// [`ImportRejected`](crate::error::ErrorKind::ImportRejected).
    fn import_media(&self, paths: &[PathBuf]) -> Result<()>;

    /// Move clips into `destination`. The host does not report per-clip
    /// failures; callers that care must re-list.
    fn move_clips(&self, clips: &[Clip], destination: &Bin) -> Result<()>;
}
