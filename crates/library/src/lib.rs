//! Media library contract for reel.
//!
//! The host editing application owns the media pool; this crate only
//! describes how to talk to it ([`MediaLibrary`]) and ships the
//! implementations the rest of the workspace needs:
//!
//! - [`FileLibrary`](backend::FileLibrary): a library persisted as a JSON
//!   document, re-read on every call.
//! - [`ReadOnlyLibrary`](backend::ReadOnlyLibrary): wraps another library and
//!   skips every mutation (dry runs).
//! - `MockLibrary` (feature `mock`): in-memory library with failure
//!   injection, for tests in other crates.

pub mod backend;
pub mod error;
mod models;
mod tree;

pub use crate::backend::MediaLibrary;
pub use crate::models::{Bin, BinId, Clip, ClipId};
pub use crate::tree::LibraryTree;
use std::sync::Arc;

pub type LibraryHandle = Arc<dyn MediaLibrary>;
