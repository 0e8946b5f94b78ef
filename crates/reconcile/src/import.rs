//! Import of footage the library doesn't have yet.
//!
//! "Already imported" means exactly one thing: a clip in the target bin has
//! the same name as the file on disk. No hashes, sizes or timestamps are
//! compared.
//!
//! Imports always land in the root bin first, so filling a bin is a two step
//! affair: one bulk import of every missing file, then a move of each new clip
//! (found by name in the root bin) into the target bin.

use crate::disk;
use crate::error::{ErrorKind, Result};
use crate::{Context, VideoExtensions};
use exn::ResultExt;
use reel_library::{Bin, MediaLibrary};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The outcome of (successfully) filling a bin from a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// Every video in the folder already has a clip in the bin.
    NothingMissing,
    /// An import was issued for `requested` files; `relocated` of them were
    /// found in the bin afterwards.
    Imported { requested: usize, relocated: usize },
}
impl Import {
    /// Whether any media was brought into the library.
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }
}

/// Names of video files directly inside `folder` that have no same-named clip
/// in `bin`.
#[instrument(skip_all, fields(bin = %bin.name, folder = %folder.display()))]
pub fn compute_missing(
    library: &dyn MediaLibrary,
    bin: &Bin,
    folder: &Path,
    extensions: &VideoExtensions,
) -> Result<BTreeSet<String>> {
    let existing: BTreeSet<String> =
        library.list_clips(bin).or_raise(|| ErrorKind::Library)?.into_iter().map(|clip| clip.name).collect();
    let on_disk: BTreeSet<String> = disk::video_files(folder, extensions)?.into_iter().collect();
    Ok(on_disk.difference(&existing).cloned().collect())
}

/// Import `missing` (file names inside `folder`) and move the resulting clips
/// from the root bin into `bin`.
///
/// Every root bin clip whose name is in `missing` is moved, one move per
/// clip. Individual moves are not checked by the host, so the bin is re-listed
/// afterwards to count how many actually arrived.
///
/// # Errors
/// A rejected import request raises [`ErrorKind::Import`]; the bin is left
/// untouched.
#[instrument(skip_all, fields(bin = %bin.name, missing = missing.len()))]
pub fn import_and_relocate(
    library: &dyn MediaLibrary,
    bin: &Bin,
    folder: &Path,
    missing: &BTreeSet<String>,
) -> Result<Import> {
    if missing.is_empty() {
        return Ok(Import::NothingMissing);
    }
    let paths: Vec<PathBuf> = missing.iter().map(|name| folder.join(name)).collect();
    library.import_media(&paths).or_raise(|| ErrorKind::Import(bin.name.clone()))?;

    let root = library.root_bin().or_raise(|| ErrorKind::Library)?;
    for clip in library.list_clips(&root).or_raise(|| ErrorKind::Library)? {
        if !missing.contains(&clip.name) {
            continue;
        }
        if let Err(e) = library.move_clips(std::slice::from_ref(&clip), bin) {
            tracing::warn!(clip = %clip.name, error = ?e, "Could not move imported clip");
        }
    }

    let arrived = library.list_clips(bin).or_raise(|| ErrorKind::Library)?;
    let relocated = missing.iter().filter(|name| arrived.iter().any(|clip| &clip.name == *name)).count();
    if relocated < missing.len() {
        tracing::warn!(requested = missing.len(), relocated, "Not every imported clip reached its bin");
    }
    Ok(Import::Imported {
        requested: missing.len(),
        relocated,
    })
}

/// [`compute_missing`] followed by [`import_and_relocate`].
pub fn fill_bin(library: &dyn MediaLibrary, bin: &Bin, folder: &Path, ctx: &Context) -> Result<Import> {
    let missing = compute_missing(library, bin, folder, &ctx.extensions)?;
    import_and_relocate(library, bin, folder, &missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_library::backend::MockLibrary;
    use std::fs;

    fn folder(files: &[&str]) -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(temp_dir.path().join(file), b"").unwrap();
        }
        temp_dir
    }

    fn names(library: &MockLibrary, bin: &Bin) -> Vec<String> {
        library.list_clips(bin).unwrap().into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_compute_missing() {
        let dir = folder(&["a.mp4", "b.mov", "c.txt"]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        library.import_media(&[dir.path().join("a.mp4")]).unwrap();
        library.move_clips(&library.list_clips(&root).unwrap(), &bin).unwrap();

        let missing = compute_missing(&library, &bin, dir.path(), &VideoExtensions::default()).unwrap();
        assert_eq!(missing, BTreeSet::from(["b.mov".to_string()]));
    }

    #[test]
    fn test_compute_missing_ignores_other_bins() {
        let dir = folder(&["a.mp4"]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        // Same name, but sitting in the root bin rather than the target.
        library.import_media(&[dir.path().join("a.mp4")]).unwrap();
        let missing = compute_missing(&library, &bin, dir.path(), &VideoExtensions::default()).unwrap();
        assert_eq!(missing, BTreeSet::from(["a.mp4".to_string()]));
    }

    #[test]
    fn test_compute_missing_is_case_sensitive_on_names() {
        let dir = folder(&["A.MP4"]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        library.import_media(&[PathBuf::from("a.mp4")]).unwrap();
        library.move_clips(&library.list_clips(&root).unwrap(), &bin).unwrap();
        let missing = compute_missing(&library, &bin, dir.path(), &VideoExtensions::default()).unwrap();
        assert_eq!(missing, BTreeSet::from(["A.MP4".to_string()]));
    }

    #[test]
    fn test_nothing_missing_has_no_side_effect() {
        let dir = folder(&[]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let outcome = import_and_relocate(&library, &root, dir.path(), &BTreeSet::new()).unwrap();
        assert_eq!(outcome, Import::NothingMissing);
        assert!(!outcome.is_update());
        assert!(library.import_requests().is_empty());
        assert_eq!(library.move_requests(), 0);
    }

    #[test]
    fn test_import_and_relocate() {
        let dir = folder(&["a.mp4", "b.mov"]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        // Unrelated clip already waiting in the root bin stays put.
        library.import_media(&[PathBuf::from("/elsewhere/other.mp4")]).unwrap();

        let missing = BTreeSet::from(["a.mp4".to_string(), "b.mov".to_string()]);
        let outcome = import_and_relocate(&library, &bin, dir.path(), &missing).unwrap();
        assert_eq!(outcome, Import::Imported { requested: 2, relocated: 2 });
        assert!(outcome.is_update());
        assert_eq!(library.import_requests()[1], vec![dir.path().join("a.mp4"), dir.path().join("b.mov")]);
        assert_eq!(names(&library, &bin), ["a.mp4", "b.mov"]);
        assert_eq!(names(&library, &root), ["other.mp4"]);
        // One move per clip.
        assert_eq!(library.move_requests(), 2);
    }

    #[test]
    fn test_import_rejected_leaves_bin_untouched() {
        let dir = folder(&["a.mp4"]);
        let library = MockLibrary::default().reject_imports();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        let missing = BTreeSet::from(["a.mp4".to_string()]);
        let err = import_and_relocate(&library, &bin, dir.path(), &missing).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Import(name) if name == "Day"));
        assert!(names(&library, &bin).is_empty());
        assert_eq!(library.move_requests(), 0);
    }

    #[test]
    fn test_relocation_shortfall_is_reported() {
        let dir = folder(&["a.mp4"]);
        let library = MockLibrary::default().swallow_imports();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        let missing = BTreeSet::from(["a.mp4".to_string()]);
        let outcome = import_and_relocate(&library, &bin, dir.path(), &missing).unwrap();
        assert_eq!(outcome, Import::Imported { requested: 1, relocated: 0 });
    }

    #[test]
    fn test_fill_bin_twice() {
        let dir = folder(&["a.mp4", "b.mov", "c.txt"]);
        let library = MockLibrary::default();
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        let ctx = Context::default();
        assert_eq!(fill_bin(&library, &bin, dir.path(), &ctx).unwrap(), Import::Imported { requested: 2, relocated: 2 });
        assert_eq!(fill_bin(&library, &bin, dir.path(), &ctx).unwrap(), Import::NothingMissing);
        assert_eq!(library.import_requests().len(), 1);
    }
}
