//! In-process model of a host media library.
//!
//! [`LibraryTree`] is the arena both [`MockLibrary`](crate::backend::MockLibrary)
//! and [`FileLibrary`](crate::backend::FileLibrary) operate on. It reproduces the
//! host rules the reconcile engine depends on:
//!
//! - imports always land in the root bin, one clip per path, named by the
//!   file's base name;
//! - a clip lives in exactly one bin, moving it removes it from the old one;
//! - sibling bins may not share a name (bins elsewhere in the tree may).

use crate::error::{ErrorKind, Result};
use crate::models::{Bin, BinId, Clip, ClipId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinNode {
    name: String,
    parent: Option<BinId>,
    children: Vec<BinId>,
    clips: Vec<ClipId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClipNode {
    name: String,
    path: PathBuf,
    bin: BinId,
}

/// Arena of bins and clips. Identifiers are indices and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryTree {
    bins: Vec<BinNode>,
    clips: Vec<ClipNode>,
}
impl LibraryTree {
    /// Create a library containing nothing but a root bin.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            bins: vec![BinNode {
                name: root_name.into(),
                parent: None,
                children: vec![],
                clips: vec![],
            }],
            clips: vec![],
        }
    }

    pub fn root(&self) -> Bin {
        Bin::new(BinId::new(0), &self.bins[0].name)
    }

    fn node(&self, id: BinId) -> Result<&BinNode> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.bins.get(index))
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(id)))
    }

    fn node_mut(&mut self, id: BinId) -> Result<&mut BinNode> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.bins.get_mut(index))
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(id)))
    }

    fn bin_handle(&self, id: BinId) -> Result<Bin> {
        Ok(Bin::new(id, &self.node(id)?.name))
    }

    fn clip_handle(&self, id: ClipId) -> Clip {
        // Clip identifiers are only ever produced by this arena.
        Clip::new(id, &self.clips[id.get() as usize].name)
    }

    /// Direct children of `bin`, in creation order.
    pub fn subbins(&self, bin: BinId) -> Result<Vec<Bin>> {
        self.node(bin)?.children.iter().map(|child| self.bin_handle(*child)).collect()
    }

    /// Clips currently inside `bin`, in the order they arrived there.
    pub fn clips(&self, bin: BinId) -> Result<Vec<Clip>> {
        Ok(self.node(bin)?.clips.iter().map(|clip| self.clip_handle(*clip)).collect())
    }

    /// Check that a deserialized arena is internally consistent: a root bin
    /// with no parent, and every parent, child and clip identifier in range.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Document`]. The offending identifier is logged.
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.bins.first() else {
            tracing::warn!("Library document has no root bin");
            exn::bail!(ErrorKind::Document);
        };
        if root.parent.is_some() {
            tracing::warn!("Library document root bin has a parent");
            exn::bail!(ErrorKind::Document);
        }
        let has_bin = |id: BinId| in_range(id.get(), self.bins.len());
        let has_clip = |id: ClipId| in_range(id.get(), self.clips.len());
        for (index, node) in self.bins.iter().enumerate() {
            if index > 0 && !node.parent.is_some_and(has_bin) {
                tracing::warn!(bin = index, parent = ?node.parent, "Library document bin has no valid parent");
                exn::bail!(ErrorKind::Document);
            }
            if let Some(child) = node.children.iter().find(|child| !has_bin(**child)) {
                tracing::warn!(bin = index, %child, "Library document references unknown child bin");
                exn::bail!(ErrorKind::Document);
            }
            if let Some(clip) = node.clips.iter().find(|clip| !has_clip(**clip)) {
                tracing::warn!(bin = index, %clip, "Library document references unknown clip");
                exn::bail!(ErrorKind::Document);
            }
        }
        if let Some((index, clip)) = self.clips.iter().enumerate().find(|(_, clip)| !has_bin(clip.bin)) {
            tracing::warn!(clip = index, bin = %clip.bin, "Library document clip sits in unknown bin");
            exn::bail!(ErrorKind::Document);
        }
        Ok(())
    }

    /// Create a child bin. Fails with [`ErrorKind::AlreadyExists`] when a
    /// sibling already carries `name`.
    pub fn add_bin(&mut self, parent: BinId, name: &str) -> Result<Bin> {
        let siblings = &self.node(parent)?.children;
        if siblings.iter().any(|sibling| self.bins[sibling.get() as usize].name == name) {
            exn::bail!(ErrorKind::AlreadyExists(name.to_string()));
        }
        let id = BinId::new(self.bins.len() as u64);
        self.bins.push(BinNode {
            name: name.to_string(),
            parent: Some(parent),
            children: vec![],
            clips: vec![],
        });
        self.node_mut(parent)?.children.push(id);
        Ok(Bin::new(id, name))
    }

    /// Import every path into the root bin, returning the new clips. Paths
    /// without a file name are skipped.
    pub fn import<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<Clip> {
        let root = self.root().id;
        let mut imported = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let Some(name) = path.file_name() else {
                tracing::debug!(path = %path.display(), "Skipping import of path without a file name");
                continue;
            };
            let id = ClipId::new(self.clips.len() as u64);
            let name = name.to_string_lossy().into_owned();
            self.clips.push(ClipNode {
                name: name.clone(),
                path: path.to_path_buf(),
                bin: root,
            });
            self.bins[0].clips.push(id);
            imported.push(Clip::new(id, name));
        }
        imported
    }

    /// Move clips into `destination`. Unknown clip identifiers are ignored,
    /// as the host does.
    pub fn move_clips(&mut self, clips: &[Clip], destination: BinId) -> Result<()> {
        self.node(destination)?;
        for clip in clips {
            let Some(node) = self.clips.get_mut(clip.id.get() as usize) else {
                tracing::debug!(clip = %clip.id, name = %clip.name, "Ignoring move of unknown clip");
                continue;
            };
            tracing::debug!(clip = %clip.id, path = %node.path.display(), bin = %destination, "Moving clip");
            let source = std::mem::replace(&mut node.bin, destination);
            self.bins[source.get() as usize].clips.retain(|id| *id != clip.id);
            self.bins[destination.get() as usize].clips.push(clip.id);
        }
        Ok(())
    }

    /// Path of bin names from the root down to `bin`, inclusive.
    pub fn lineage(&self, bin: BinId) -> Result<Vec<String>> {
        let mut names = vec![];
        let mut current = Some(bin);
        while let Some(id) = current {
            let node = self.node(id)?;
            names.push(node.name.clone());
            current = node.parent;
        }
        names.reverse();
        Ok(names)
    }
}

fn in_range(id: u64, len: usize) -> bool {
    usize::try_from(id).is_ok_and(|index| index < len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_has_root_only() {
        let tree = LibraryTree::new("Master");
        let root = tree.root();
        assert_eq!(root.name, "Master");
        assert!(tree.subbins(root.id).unwrap().is_empty());
        assert!(tree.clips(root.id).unwrap().is_empty());
    }

    #[test]
    fn test_add_bin_rejects_sibling_duplicate() {
        let mut tree = LibraryTree::new("Master");
        let root = tree.root().id;
        let day = tree.add_bin(root, "2024-11-22 - A").unwrap();
        let err = tree.add_bin(root, "2024-11-22 - A").unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(name) if name == "2024-11-22 - A"));
        // Same name further down the tree is allowed.
        assert!(tree.add_bin(day.id, "2024-11-22 - A").is_ok());
    }

    #[test]
    fn test_import_lands_in_root() {
        let mut tree = LibraryTree::new("Master");
        let root = tree.root().id;
        let bin = tree.add_bin(root, "Day").unwrap();
        let clips = tree.import(&["/footage/a.mp4", "/footage/sub/b.MOV"]);
        assert_eq!(clips.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["a.mp4", "b.MOV"]);
        assert_eq!(tree.clips(root).unwrap(), clips);
        assert!(tree.clips(bin.id).unwrap().is_empty());
    }

    #[rstest]
    #[case(&["/footage/a.mp4"], &["a.mp4"])]
    #[case(&["/", "/footage/.."], &[])]
    #[case(&["/footage/a.mp4", "/other/a.mp4"], &["a.mp4", "a.mp4"])]
    fn test_import_names(#[case] paths: &[&str], #[case] expected: &[&str]) {
        let mut tree = LibraryTree::new("Master");
        let names: Vec<_> = tree.import(paths).into_iter().map(|c| c.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_move_clips() {
        let mut tree = LibraryTree::new("Master");
        let root = tree.root().id;
        let bin = tree.add_bin(root, "Day").unwrap();
        let clips = tree.import(&["a.mp4", "b.mp4"]);
        tree.move_clips(&clips[..1], bin.id).unwrap();
        assert_eq!(tree.clips(bin.id).unwrap(), vec![clips[0].clone()]);
        assert_eq!(tree.clips(root).unwrap(), vec![clips[1].clone()]);
    }

    #[test]
    fn test_move_to_unknown_bin() {
        let mut tree = LibraryTree::new("Master");
        let clips = tree.import(&["a.mp4"]);
        let err = tree.move_clips(&clips, BinId::new(42)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_lineage() {
        let mut tree = LibraryTree::new("Master");
        let a = tree.add_bin(tree.root().id, "A").unwrap();
        let b = tree.add_bin(a.id, "B").unwrap();
        assert_eq!(tree.lineage(b.id).unwrap(), ["Master", "A", "B"]);
    }

    #[test]
    fn test_document_roundtrip_preserves_structure() {
        let mut tree = LibraryTree::new("Master");
        let bin = tree.add_bin(tree.root().id, "Day").unwrap();
        let clips = tree.import(&["a.mp4"]);
        tree.move_clips(&clips, bin.id).unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: LibraryTree = serde_json::from_str(&json).unwrap();
        assert!(restored.validate().is_ok());
        assert_eq!(restored.subbins(restored.root().id).unwrap(), vec![bin.clone()]);
        assert_eq!(restored.clips(bin.id).unwrap(), clips);
    }
}
