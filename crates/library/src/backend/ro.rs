//! Read-only media library.
//!
//! This module provides a library implementation that wraps other
//! implementations and prevents mutations from executing, while indicating
//! success on return.

use crate::error::{ErrorKind, Result};
use crate::models::{Bin, BinId, Clip};
use crate::{LibraryHandle, MediaLibrary};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// Read-only media library.
///
/// Wraps another library and silently drops all mutations, logging an
/// [`info event`](tracing::Event). Bins it pretends to create are *detached*:
/// they have identifiers that the wrapped library never hands out, and list
/// no clips or sub-bins.
pub struct ReadOnlyLibrary {
    inner: LibraryHandle,
    detached: Mutex<HashSet<BinId>>,
}
impl ReadOnlyLibrary {
    pub fn new(inner: LibraryHandle) -> Self {
        Self {
            inner,
            detached: Mutex::new(HashSet::new()),
        }
    }

    fn is_detached(&self, bin: &Bin) -> Result<bool> {
        let detached = self.detached.lock().map_err(|_| exn::Exn::from(ErrorKind::Unavailable))?;
        Ok(detached.contains(&bin.id))
    }
}

impl MediaLibrary for ReadOnlyLibrary {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn root_bin(&self) -> Result<Bin> {
        self.inner.root_bin()
    }

    fn add_subfolder(&self, parent: &Bin, name: &str) -> Result<Bin> {
        tracing::info!(parent = %parent.name, bin = name, "Skipping bin creation during read-only mode");
        let mut detached = self.detached.lock().map_err(|_| exn::Exn::from(ErrorKind::Unavailable))?;
        // Count down from the top of the identifier space.
        let id = BinId::new(u64::MAX - detached.len() as u64);
        detached.insert(id);
        Ok(Bin::new(id, name))
    }

    fn list_subbins(&self, bin: &Bin) -> Result<Vec<Bin>> {
        match self.is_detached(bin)? {
            true => Ok(vec![]),
            false => self.inner.list_subbins(bin),
        }
    }

    fn list_clips(&self, bin: &Bin) -> Result<Vec<Clip>> {
        match self.is_detached(bin)? {
            true => Ok(vec![]),
            false => self.inner.list_clips(bin),
        }
    }

    fn import_media(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            tracing::info!(path = %path.display(), "Skipping import during read-only mode");
        }
        Ok(())
    }

    fn move_clips(&self, clips: &[Clip], destination: &Bin) -> Result<()> {
        tracing::info!(clips = clips.len(), bin = %destination.name, "Skipping clip move during read-only mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockLibrary;
    use std::sync::Arc;

    #[test]
    fn test_mutations_are_skipped() {
        let inner = Arc::new(MockLibrary::default());
        let library = ReadOnlyLibrary::new(inner.clone());
        let root = library.root_bin().unwrap();
        let bin = library.add_subfolder(&root, "Day").unwrap();
        library.import_media(&[PathBuf::from("a.mp4")]).unwrap();
        library.move_clips(&[], &bin).unwrap();
        assert!(inner.list_subbins(&root).unwrap().is_empty());
        assert!(inner.import_requests().is_empty());
        assert!(library.list_clips(&bin).unwrap().is_empty());
        assert!(library.list_subbins(&bin).unwrap().is_empty());
    }

    #[test]
    fn test_detached_ids_are_unique() {
        let library = ReadOnlyLibrary::new(Arc::new(MockLibrary::default()));
        let root = library.root_bin().unwrap();
        let a = library.add_subfolder(&root, "A").unwrap();
        let b = library.add_subfolder(&root, "B").unwrap();
        assert_ne!(a.id, b.id);
    }
}
