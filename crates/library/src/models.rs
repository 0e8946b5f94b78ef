//! Library handle types.
//!
//! [`Bin`] and [`Clip`] are snapshots handed out by a
//! [`MediaLibrary`](crate::MediaLibrary): the identifier is what the library
//! acts on, the name is what was true at the time of listing. Callers should
//! re-list rather than hold on to them across unrelated operations.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a bin inside one library.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct BinId(u64);
impl BinId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque identifier of a clip inside one library.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct ClipId(u64);
impl ClipId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A named folder node in the library tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub id: BinId,
    pub name: String,
}
impl Bin {
    pub fn new(id: BinId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A reference to imported media, identified by the imported file's base name
/// (extension included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub id: ClipId,
    pub name: String,
}
impl Clip {
    pub fn new(id: ClipId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}
