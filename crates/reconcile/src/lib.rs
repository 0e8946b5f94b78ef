//! Bin matching and import reconciliation for dated footage folders.
//!
//! Given a root folder of raw footage (`2024-11-22 Shoot/`) containing one
//! subfolder per load or location (`Alexii - Russ - L2/`), this crate works
//! out which media library bin each subfolder belongs in, creates the ones
//! that are missing, imports whatever footage the library doesn't have yet,
//! and hands each bin the "load" video from the root folder that matches the
//! `L<n>` suffix in its name.
//!
//! The primary entry point is [`reconcile`], which drives the whole run and
//! reports [`Event`]s as it goes. The building blocks are public too:
//!
//! - [`naming`]: date prefixes, subfolder labels and load numbers.
//! - [`resolve`]: depth-first bin lookup and bin creation.
//! - [`import`]: on-disk vs. in-library set difference and bulk import.
//! - [`load`]: load video discovery, ordering and assignment.
//!
//! All library access goes through [`reel_library::MediaLibrary`]; nothing
//! about the library is cached between subfolders.

mod consts;
mod disk;
pub mod error;
pub mod import;
pub mod load;
pub mod naming;
pub mod resolve;
mod run;

pub use crate::run::{Event, Summary, reconcile};

/// Extensions recognised as video when no configuration says otherwise.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "mxf", "avi"];

/// Case-insensitive set of file extensions treated as video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoExtensions(Vec<String>);
impl VideoExtensions {
    /// Accepts extensions with or without their leading dot, in any case.
    pub fn new(extensions: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self(
            extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .map(|ext| format!(".{ext}"))
                .collect(),
        )
    }

    /// Whether the lowercased `file_name` ends with one of the extensions.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.0.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}
impl Default for VideoExtensions {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_EXTENSIONS)
    }
}

/// Settings for a single run.
#[derive(Debug, Clone)]
pub struct Context {
    pub extensions: VideoExtensions,
    /// Import the matching root-level load video into each `L<n>` bin.
    pub assign_loads: bool,
}
impl Default for Context {
    fn default() -> Self {
        Self {
            extensions: VideoExtensions::default(),
            assign_loads: true,
        }
    }
}
