//! Load video discovery and assignment.
//!
//! A load video is a video file sitting directly in the root folder (not in a
//! subfolder) whose name embeds at least one number. Load videos are ordered
//! by the largest number embedded in their file stem, and the bin declaring
//! load `N` gets the `N`th smallest. Equal keys fall back to file name order.

use crate::VideoExtensions;
use crate::consts::DIGIT_RUN_REGEX;
use crate::disk;
use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use reel_library::{Bin, MediaLibrary};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A root-level video with its ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadVideo {
    pub path: PathBuf,
    pub name: String,
    pub key: u64,
}

/// The largest integer embedded in the file stem of `file_name`, or [`None`]
/// if the stem contains no digits. The extension never contributes (so the
/// `4` of `.mp4` doesn't swamp `clip_1`). Numbers too large for a `u64`
/// saturate.
pub fn sort_key(file_name: &str) -> Option<u64> {
    let stem = Path::new(file_name).file_stem().and_then(|stem| stem.to_str()).unwrap_or(file_name);
    DIGIT_RUN_REGEX.find_iter(stem).map(|run| run.as_str().parse::<u64>().unwrap_or(u64::MAX)).max()
}

/// List the load videos directly inside `root_folder`, ordered ascending by
/// [`sort_key`] then by name.
///
/// Meant to be called once per run; the result is reused for every subfolder.
#[instrument(skip_all, fields(root = %root_folder.display()))]
pub fn scan_load_videos(root_folder: &Path, extensions: &VideoExtensions) -> Result<Vec<LoadVideo>> {
    let mut videos: Vec<LoadVideo> = disk::video_files(root_folder, extensions)?
        .into_iter()
        .filter_map(|name| {
            let key = sort_key(&name)?;
            Some(LoadVideo { path: root_folder.join(&name), name, key })
        })
        .collect();
    videos.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.name.cmp(&b.name)));
    tracing::debug!(count = videos.len(), "Discovered load videos");
    Ok(videos)
}

/// The outcome of (successfully) assigning a load video to a bin.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LoadOutcome {
    /// The root folder holds no load videos at all.
    #[display("no load videos available")]
    NoCandidates,
    /// `L0` doesn't index anything.
    #[display("load number 0 does not match any load video")]
    InvalidLoadNumber,
    /// The bin asks for load `load` but only `available` videos exist.
    #[display("load L{load} requested but only {available} load videos found")]
    InsufficientCandidates { load: u32, available: usize },
    /// The matching video already has a clip in the bin.
    #[display("load video already present: {_0}")]
    AlreadyPresent(String),
    /// The matching video was imported and moved into the bin.
    #[display("imported load video: {_0}")]
    Relocated(String),
    /// The matching video was imported but no clip of that name could be found
    /// in the root bin (or moved out of it) afterwards.
    #[display("imported load video but could not move it into the bin: {_0}")]
    NotRelocated(String),
}
impl LoadOutcome {
    /// Whether an import request was sent to the library.
    pub fn attempted_import(&self) -> bool {
        matches!(self, Self::Relocated(_) | Self::NotRelocated(_))
    }

    /// Whether the bin received new media.
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Relocated(_))
    }
}

/// Import the `load_number`th (1-indexed) of `videos` into `bin`, unless a
/// clip with that name is already there.
///
/// # Errors
/// A rejected import request raises [`ErrorKind::Import`].
#[instrument(skip(library, bin, videos), fields(bin = %bin.name, candidates = videos.len()))]
pub fn assign_load_video(
    library: &dyn MediaLibrary,
    bin: &Bin,
    load_number: u32,
    videos: &[LoadVideo],
) -> Result<LoadOutcome> {
    if videos.is_empty() {
        return Ok(LoadOutcome::NoCandidates);
    }
    let Some(index) = (load_number as usize).checked_sub(1) else {
        return Ok(LoadOutcome::InvalidLoadNumber);
    };
    let Some(video) = videos.get(index) else {
        return Ok(LoadOutcome::InsufficientCandidates {
            load: load_number,
            available: videos.len(),
        });
    };

    let existing = library.list_clips(bin).or_raise(|| ErrorKind::Library)?;
    if existing.iter().any(|clip| clip.name == video.name) {
        return Ok(LoadOutcome::AlreadyPresent(video.name.clone()));
    }

    library.import_media(std::slice::from_ref(&video.path)).or_raise(|| ErrorKind::Import(bin.name.clone()))?;
    let root = library.root_bin().or_raise(|| ErrorKind::Library)?;
    let imported = library.list_clips(&root).or_raise(|| ErrorKind::Library)?.into_iter().find(|clip| clip.name == video.name);
    let Some(clip) = imported else {
        tracing::warn!(video = %video.name, "Imported load video not found in root bin");
        return Ok(LoadOutcome::NotRelocated(video.name.clone()));
    };
    match library.move_clips(std::slice::from_ref(&clip), bin) {
        Ok(()) => Ok(LoadOutcome::Relocated(video.name.clone())),
        Err(e) => {
            tracing::warn!(video = %video.name, error = ?e, "Could not move load video");
            Ok(LoadOutcome::NotRelocated(video.name.clone()))
        },
    }
}
