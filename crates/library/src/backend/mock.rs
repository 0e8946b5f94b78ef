//! In-memory media library for testing.

use crate::MediaLibrary;
use crate::error::{ErrorKind, Result};
use crate::models::{Bin, Clip};
use crate::tree::LibraryTree;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    tree: LibraryTree,
    imports: Vec<Vec<PathBuf>>,
    moves: usize,
}

/// In-memory media library for testing.
///
/// The tree lives behind a [`RwLock`], so all trait methods can operate on
/// `&self` without external synchronisation. Builder methods inject the host
/// failures the reconcile engine has to survive.
///
/// # Examples
///
/// ```ignore
/// // Requires the `mock` feature.
/// use reel_library::MediaLibrary;
/// use reel_library::backend::MockLibrary;
/// use std::path::PathBuf;
///
/// let library = MockLibrary::default();
/// let root = library.root_bin().unwrap();
/// library.import_media(&[PathBuf::from("/footage/a.mp4")]).unwrap();
/// assert_eq!(library.list_clips(&root).unwrap()[0].name, "a.mp4");
/// assert_eq!(library.import_requests().len(), 1);
/// ```
pub struct MockLibrary {
    name: String,
    state: RwLock<State>,
    unavailable: bool,
    reject_imports: bool,
    swallow_imports: bool,
    refused: HashSet<String>,
}

impl MockLibrary {
    /// Create a mock library around an existing tree.
    pub fn with_tree(tree: LibraryTree) -> Self {
        Self {
            name: "mock".to_string(),
            state: RwLock::new(State {
                tree,
                imports: vec![],
                moves: 0,
            }),
            unavailable: false,
            reject_imports: false,
            swallow_imports: false,
            refused: HashSet::new(),
        }
    }

    /// Change the name of the mock library.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Every call fails with [`ErrorKind::Unavailable`].
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Every import request fails as a whole.
    pub fn reject_imports(mut self) -> Self {
        self.reject_imports = true;
        self
    }

    /// Import requests report success but produce no clips.
    pub fn swallow_imports(mut self) -> Self {
        self.swallow_imports = true;
        self
    }

    /// Creating a bin with this name fails with [`ErrorKind::Refused`].
    pub fn refuse_bin(mut self, name: impl Into<String>) -> Self {
        self.refused.insert(name.into());
        self
    }

    /// Copy of the current tree, for assertions.
    pub fn snapshot(&self) -> LibraryTree {
        self.read().map(|state| state.tree.clone()).unwrap_or_else(|_| LibraryTree::new("Master"))
    }

    /// Every import request received so far, including rejected ones.
    pub fn import_requests(&self) -> Vec<Vec<PathBuf>> {
        self.read().map(|state| state.imports.clone()).unwrap_or_default()
    }

    /// Number of move requests received so far.
    pub fn move_requests(&self) -> usize {
        self.read().map(|state| state.moves).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        if self.unavailable {
            exn::bail!(ErrorKind::Unavailable);
        }
        self.state.read().map_err(|_| exn::Exn::from(ErrorKind::Unavailable))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        if self.unavailable {
            exn::bail!(ErrorKind::Unavailable);
        }
        self.state.write().map_err(|_| exn::Exn::from(ErrorKind::Unavailable))
    }
}
impl Default for MockLibrary {
    fn default() -> Self {
        Self::with_tree(LibraryTree::new("Master"))
    }
}

impl MediaLibrary for MockLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_bin(&self) -> Result<Bin> {
        Ok(self.read()?.tree.root())
    }

    fn add_subfolder(&self, parent: &Bin, name: &str) -> Result<Bin> {
        if self.refused.contains(name) {
            exn::bail!(ErrorKind::Refused(name.to_string()));
        }
        self.write()?.tree.add_bin(parent.id, name)
    }

    fn list_subbins(&self, bin: &Bin) -> Result<Vec<Bin>> {
        self.read()?.tree.subbins(bin.id)
    }

    fn list_clips(&self, bin: &Bin) -> Result<Vec<Clip>> {
        self.read()?.tree.clips(bin.id)
    }

    fn import_media(&self, paths: &[PathBuf]) -> Result<()> {
        let mut state = self.write()?;
        state.imports.push(paths.to_vec());
        if self.reject_imports {
            exn::bail!(ErrorKind::ImportRejected);
        }
        if !self.swallow_imports {
            state.tree.import(paths);
        }
        Ok(())
    }

    fn move_clips(&self, clips: &[Clip], destination: &Bin) -> Result<()> {
        let mut state = self.write()?;
        state.moves += 1;
        state.tree.move_clips(clips, destination.id)
    }
}
