use crate::Context;
use crate::disk::{self, Subfolder};
use crate::error::{ErrorKind, Precondition, Result};
use crate::import::{self, Import};
use crate::load::{self, LoadOutcome, LoadVideo};
use crate::naming;
use crate::resolve::{self, Resolution};
use exn::ResultExt;
use reel_library::{Bin, MediaLibrary};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A line-oriented progress report emitted during [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started {
        root: PathBuf,
        date_prefix: String,
        subfolders: usize,
        load_videos: usize,
    },
    BinExists(String),
    BinCreated(String),
    BinCreationFailed(String),
    NothingMissing(String),
    Imported {
        bin: String,
        requested: usize,
        relocated: usize,
    },
    ImportFailed(String),
    Load {
        bin: String,
        outcome: LoadOutcome,
    },
    LoadImportFailed(String),
    Finished(Summary),
}
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                root,
                date_prefix,
                subfolders,
                load_videos,
            } => write!(
                f,
                "Scanning {} ({subfolders} subfolders, {load_videos} load videos, date prefix {date_prefix})",
                root.display()
            ),
            Self::BinExists(bin) => write!(f, "Bin already exists: {bin}"),
            Self::BinCreated(bin) => write!(f, "Created new bin: {bin}"),
            Self::BinCreationFailed(bin) => write!(f, "Failed to create: {bin}"),
            Self::NothingMissing(bin) => write!(f, "No missing files in: {bin}"),
            Self::Imported {
                bin,
                requested,
                relocated,
            } if relocated < requested => write!(
                f,
                "Imported {requested} files to: {bin} (only {relocated} could be moved into the bin)"
            ),
            Self::Imported { bin, requested, .. } => write!(f, "Imported {requested} files to: {bin}"),
            Self::ImportFailed(bin) => write!(f, "Failed to import missing files to: {bin}"),
            Self::Load { bin, outcome } => write!(f, "{bin}: {outcome}"),
            Self::LoadImportFailed(bin) => write!(f, "Failed to import load video to: {bin}"),
            Self::Finished(summary) => write!(f, "{summary}"),
        }
    }
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Subfolders visited, including ones that failed.
    pub scanned: usize,
    pub created: Vec<String>,
    /// Bins that already existed and received new media this run.
    pub updated: Vec<String>,
    /// Import requests issued, successful or not.
    pub imports: usize,
}
impl Summary {
    /// Names of every bin created or updated, created first.
    pub fn bins(&self) -> Vec<String> {
        self.created.iter().chain(self.updated.iter()).cloned().collect()
    }
}
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary ===")?;
        writeln!(f, "Total folders scanned: {}", self.scanned)?;
        writeln!(f, "New bins created: {}", self.created.len())?;
        writeln!(f, "Existing bins updated: {}", self.updated.len())?;
        write!(f, "Import operations attempted: {}", self.imports)?;
        for (heading, names) in [("Created bins", &self.created), ("Updated bins", &self.updated)] {
            if names.is_empty() {
                continue;
            }
            write!(f, "\n\n{heading}:")?;
            for name in names {
                write!(f, "\n- {name}")?;
            }
        }
        Ok(())
    }
}

/// Reconcile every subfolder of `root_folder` against `library`.
///
/// For each subfolder (in name order) the matching bin is found anywhere in
/// the library or created under the root bin, missing videos are imported into
/// it, and, when the bin name ends in `L<n>`, the `n`th load video from the
/// root folder is imported as well. Every step is reported to `report`; the
/// final [`Event::Finished`] carries the same [`Summary`] that is returned.
///
/// # Errors
/// - [`ErrorKind::Precondition`] when the run cannot start. Nothing has been
///   touched in that case.
/// - [`ErrorKind::Filesystem`] or [`ErrorKind::Library`] when an unexpected
///   failure aborts the run part way through. Work already done is kept.
///
/// Bin creation and import failures only skip the affected subfolder.
#[instrument(skip(library, ctx, report), fields(library = library.name()))]
pub fn reconcile(
    library: &dyn MediaLibrary,
    root_folder: &Path,
    ctx: &Context,
    report: &mut dyn FnMut(Event),
) -> Result<Summary> {
    if root_folder.as_os_str().is_empty() {
        exn::bail!(ErrorKind::Precondition(Precondition::NoFolder));
    }
    if !root_folder.is_dir() {
        exn::bail!(ErrorKind::Precondition(Precondition::FolderMissing(root_folder.to_path_buf())));
    }
    let root_bin = library.root_bin().or_raise(|| ErrorKind::Precondition(Precondition::LibraryUnavailable))?;
    let subfolders = disk::subfolders(root_folder)?;
    if subfolders.is_empty() {
        exn::bail!(ErrorKind::Precondition(Precondition::NoSubfolders(root_folder.to_path_buf())));
    }

    let date_prefix = naming::derive_date_prefix(&root_folder_name(root_folder));
    let load_videos = if ctx.assign_loads {
        load::scan_load_videos(root_folder, &ctx.extensions)?
    } else {
        Vec::new()
    };
    tracing::info!(%date_prefix, subfolders = subfolders.len(), load_videos = load_videos.len(), "Starting run");
    report(Event::Started {
        root: root_folder.to_path_buf(),
        date_prefix: date_prefix.clone(),
        subfolders: subfolders.len(),
        load_videos: load_videos.len(),
    });

    let pass = Pass {
        library,
        root_bin: &root_bin,
        ctx,
        load_videos: &load_videos,
    };
    let mut summary = Summary::default();
    for subfolder in &subfolders {
        summary.scanned += 1;
        pass.process(subfolder, &date_prefix, &mut summary, report)?;
    }

    tracing::info!(
        scanned = summary.scanned,
        created = summary.created.len(),
        updated = summary.updated.len(),
        imports = summary.imports,
        "Run complete"
    );
    report(Event::Finished(summary.clone()));
    Ok(summary)
}

fn root_folder_name(root_folder: &Path) -> String {
    // A path like "shoot/.." has no file name of its own.
    let named = match root_folder.file_name() {
        Some(_) => root_folder.to_path_buf(),
        None => root_folder.canonicalize().unwrap_or_else(|_| root_folder.to_path_buf()),
    };
    named.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Everything that stays fixed while subfolders are processed.
struct Pass<'a> {
    library: &'a dyn MediaLibrary,
    root_bin: &'a Bin,
    ctx: &'a Context,
    load_videos: &'a [LoadVideo],
}
impl Pass<'_> {
    #[instrument(skip_all, fields(subfolder = %subfolder.name))]
    fn process(
        &self,
        subfolder: &Subfolder,
        date_prefix: &str,
        summary: &mut Summary,
        report: &mut dyn FnMut(Event),
    ) -> Result<()> {
        let name = naming::bin_name(date_prefix, &naming::clean_subfolder_label(&subfolder.name));

        let resolution = match resolve::find_or_create(self.library, self.root_bin, &name) {
            Ok(resolution) => resolution,
            Err(e) if e.is_local() => {
                tracing::warn!(bin = %name, error = ?e, "Skipping subfolder");
                report(Event::BinCreationFailed(name));
                return Ok(());
            },
            Err(e) => return Err(e),
        };
        match &resolution {
            Resolution::Existing(_) => report(Event::BinExists(name.clone())),
            Resolution::Created(_) => {
                summary.created.push(name.clone());
                report(Event::BinCreated(name.clone()));
            },
        }
        let bin = resolution.bin();

        let mut received_media = self.import_subfolder(bin, subfolder, summary, report)?;
        if self.ctx.assign_loads {
            received_media |= self.assign_load(bin, summary, report)?;
        }

        if received_media && matches!(resolution, Resolution::Existing(_)) {
            summary.updated.push(name);
        }
        Ok(())
    }

    fn import_subfolder(
        &self,
        bin: &Bin,
        subfolder: &Subfolder,
        summary: &mut Summary,
        report: &mut dyn FnMut(Event),
    ) -> Result<bool> {
        let missing = import::compute_missing(self.library, bin, &subfolder.path, &self.ctx.extensions)?;
        if !missing.is_empty() {
            summary.imports += 1;
        }
        match import::import_and_relocate(self.library, bin, &subfolder.path, &missing) {
            Ok(Import::NothingMissing) => {
                report(Event::NothingMissing(bin.name.clone()));
                Ok(false)
            },
            Ok(Import::Imported { requested, relocated }) => {
                report(Event::Imported {
                    bin: bin.name.clone(),
                    requested,
                    relocated,
                });
                Ok(true)
            },
            Err(e) if e.is_local() => {
                tracing::warn!(bin = %bin.name, error = ?e, "Import rejected");
                report(Event::ImportFailed(bin.name.clone()));
                Ok(false)
            },
            Err(e) => Err(e),
        }
    }

    fn assign_load(&self, bin: &Bin, summary: &mut Summary, report: &mut dyn FnMut(Event)) -> Result<bool> {
        let Some(load_number) = naming::extract_load_number(&bin.name) else {
            return Ok(false);
        };
        match load::assign_load_video(self.library, bin, load_number, self.load_videos) {
            Ok(outcome) => {
                if outcome.attempted_import() {
                    summary.imports += 1;
                }
                let updated = outcome.is_update();
                report(Event::Load {
                    bin: bin.name.clone(),
                    outcome,
                });
                Ok(updated)
            },
            Err(e) if e.is_local() => {
                summary.imports += 1;
                tracing::warn!(bin = %bin.name, error = ?e, "Load video import rejected");
                report(Event::LoadImportFailed(bin.name.clone()));
                Ok(false)
            },
            Err(e) => Err(e),
        }
    }
}
