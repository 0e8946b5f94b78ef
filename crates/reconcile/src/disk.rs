//! One-level directory listings.
//!
//! Nothing here recurses: footage subfolders are the immediate children of
//! the root folder, and only the immediate files of a folder are considered
//! for import. Listings are sorted by name so runs are reproducible regardless
//! of the order the filesystem hands entries back in.

use crate::VideoExtensions;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

/// Immediate child directory of the root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subfolder {
    pub name: String,
    pub path: PathBuf,
}

fn entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = vec![];
    for entry in fs::read_dir(dir).or_raise(|| ErrorKind::Filesystem)? {
        let entry = entry.or_raise(|| ErrorKind::Filesystem)?;
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, entry.path())),
            Err(name) => tracing::warn!(name = ?name, dir = %dir.display(), "Skipping entry with non UTF-8 name"),
        }
    }
    entries.sort();
    Ok(entries)
}

pub(crate) fn subfolders(root: &Path) -> Result<Vec<Subfolder>> {
    Ok(entries(root)?
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .map(|(name, path)| Subfolder { name, path })
        .collect())
}

/// Names of the immediate files in `dir` that look like video.
pub(crate) fn video_files(dir: &Path, extensions: &VideoExtensions) -> Result<Vec<String>> {
    Ok(entries(dir)?
        .into_iter()
        .filter(|(name, path)| extensions.matches(name) && path.is_file())
        .map(|(name, _)| name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings_are_one_level_and_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("B - Two/nested")).unwrap();
        fs::create_dir_all(root.join("A - One")).unwrap();
        fs::write(root.join("b.MOV"), b"").unwrap();
        fs::write(root.join("a.mp4"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join("B - Two/nested/deep.mp4"), b"").unwrap();

        let names: Vec<_> = subfolders(root).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["A - One", "B - Two"]);
        assert_eq!(video_files(root, &VideoExtensions::default()).unwrap(), ["a.mp4", "b.MOV"]);
        assert!(video_files(&root.join("B - Two"), &VideoExtensions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_directory_named_like_video_is_not_a_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("folder.mp4")).unwrap();
        assert!(video_files(temp_dir.path(), &VideoExtensions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = subfolders(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Filesystem));
    }
}
