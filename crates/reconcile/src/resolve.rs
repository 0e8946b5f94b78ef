//! Bin lookup and creation.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reel_library::{Bin, MediaLibrary};
use tracing::instrument;

/// How the bin for a subfolder was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A bin with the exact name was already somewhere in the library.
    Existing(Bin),
    /// No bin matched, so one was created under the root bin.
    Created(Bin),
}
impl Resolution {
    pub fn bin(&self) -> &Bin {
        match self {
            Self::Existing(bin) | Self::Created(bin) => bin,
        }
    }
}

/// Depth-first search for a bin named exactly `target_name`, starting with
/// `start` itself.
///
/// Sub-bins are searched before siblings, in the library's listing order, and
/// the first match wins. Duplicate names elsewhere in the tree are not
/// disambiguated. The library is queried live on every call.
#[instrument(level = "trace", skip(library, start), fields(start = %start.name))]
pub fn find_bin(library: &dyn MediaLibrary, start: &Bin, target_name: &str) -> Result<Option<Bin>> {
    if start.name == target_name {
        return Ok(Some(start.clone()));
    }
    for bin in library.list_subbins(start).or_raise(|| ErrorKind::Library)? {
        if let Some(found) = find_bin(library, &bin, target_name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Create a bin named `name` under `parent`.
///
/// # Errors
/// Any refusal by the library (including a name collision that appeared since
/// the last lookup) is raised as [`ErrorKind::BinCreation`]. No retry.
pub fn create_bin(library: &dyn MediaLibrary, parent: &Bin, name: &str) -> Result<Bin> {
    library.add_subfolder(parent, name).or_raise(|| ErrorKind::BinCreation(name.to_string()))
}

/// [`find_bin`] from `root`, falling back to [`create_bin`] under `root`.
pub fn find_or_create(library: &dyn MediaLibrary, root: &Bin, name: &str) -> Result<Resolution> {
    match find_bin(library, root, name)? {
        Some(bin) => Ok(Resolution::Existing(bin)),
        None => Ok(Resolution::Created(create_bin(library, root, name)?)),
    }
}
