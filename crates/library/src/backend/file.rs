//! Media library persisted as a JSON document.
//!
//! Stands in for the host application when there is no scripting bridge to
//! talk to: the whole [`LibraryTree`] is stored in one file, re-read on every
//! call and rewritten after every mutation. Re-reading means changes made by
//! someone else between two calls are always observed.

use crate::MediaLibrary;
use crate::error::{ErrorKind, Result};
use crate::models::{Bin, Clip};
use crate::tree::LibraryTree;
use exn::ResultExt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Name given to the root bin of newly created documents.
pub const DEFAULT_ROOT_BIN: &str = "Master";

/// Media library stored in a JSON document on the local filesystem.
///
/// # Examples
///
/// ```no_run
/// use reel_library::MediaLibrary;
/// use reel_library::backend::FileLibrary;
///
/// # fn example() -> reel_library::error::Result<()> {
/// let library = FileLibrary::open("resolve", "/path/to/library.json")?;
/// let root = library.root_bin()?;
/// # Ok(())
/// # }
/// ```
pub struct FileLibrary {
    name: String,
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}
impl FileLibrary {
    /// Open the library document at `path`, creating an empty library (and
    /// parent directories) if it doesn't exist yet.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Document`] if an existing file isn't a valid
    /// library document.
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let library = Self {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };
        if library.path.exists() {
            library.load()?;
        } else {
            if let Some(parent) = library.path.parent() {
                fs::create_dir_all(parent).map_err(ErrorKind::Io)?;
            }
            tracing::info!(path = %library.path.display(), "Creating new library document");
            library.save(&LibraryTree::new(DEFAULT_ROOT_BIN))?;
        }
        Ok(library)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LibraryTree> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            // The document vanishing mid-run is the file equivalent of the
            // host application going away.
            std::io::ErrorKind::NotFound => ErrorKind::Unavailable,
            _ => ErrorKind::Io(e),
        })?;
        let tree: LibraryTree = serde_json::from_slice(&bytes).or_raise(|| ErrorKind::Document)?;
        tree.validate()?;
        Ok(tree)
    }

    fn save(&self, tree: &LibraryTree) -> Result<()> {
        let directory = self.path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file = NamedTempFile::new_in(directory).map_err(ErrorKind::Io)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tree).or_raise(|| ErrorKind::Document)?;
        writer.flush().map_err(ErrorKind::Io)?;
        let file = writer.into_inner().map_err(|e| ErrorKind::Io(e.into_error()))?;
        file.persist(&self.path).map_err(|e| ErrorKind::Io(e.error))?;
        Ok(())
    }

    /// Load, mutate, and write back the document while holding the lock.
    fn update<T>(&self, f: impl FnOnce(&mut LibraryTree) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock().map_err(|_| exn::Exn::from(ErrorKind::Unavailable))?;
        let mut tree = self.load()?;
        let result = f(&mut tree)?;
        self.save(&tree)?;
        Ok(result)
    }
}

impl MediaLibrary for FileLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_bin(&self) -> Result<Bin> {
        Ok(self.load()?.root())
    }

    fn add_subfolder(&self, parent: &Bin, name: &str) -> Result<Bin> {
        self.update(|tree| tree.add_bin(parent.id, name))
    }

    fn list_subbins(&self, bin: &Bin) -> Result<Vec<Bin>> {
        self.load()?.subbins(bin.id)
    }

    fn list_clips(&self, bin: &Bin) -> Result<Vec<Clip>> {
        self.load()?.clips(bin.id)
    }

    fn import_media(&self, paths: &[PathBuf]) -> Result<()> {
        let existing: Vec<&PathBuf> = paths
            .iter()
            .filter(|path| {
                let exists = path.is_file();
                if !exists {
                    tracing::warn!(path = %path.display(), "Skipping import of missing file");
                }
                exists
            })
            .collect();
        if existing.is_empty() {
            exn::bail!(ErrorKind::ImportRejected);
        }
        self.update(|tree| {
            let clips = tree.import(&existing);
            tracing::debug!(library = self.name.as_str(), count = clips.len(), "Imported media into root bin");
            Ok(())
        })
    }

    fn move_clips(&self, clips: &[Clip], destination: &Bin) -> Result<()> {
        self.update(|tree| tree.move_clips(clips, destination.id))
    }
}
