use std::fs;
use std::path::PathBuf;

use ignore::{DirEntry, WalkBuilder};

use crate::entry::{Entry, EntryKind};
use crate::error::ScourError;
use crate::traits::Source;

/// The filesystem walker: every entry under `root`, or only its immediate
/// children when `recursive` is false.
///
/// Nothing is pruned: dot-directories are descended into like any other and
/// their dot-named entries are left for the matcher to reject. No ignore
/// files are honoured.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root:      PathBuf,
    recursive: bool,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }

    /// A root that vanished after validation ends the search. Any other
    /// listing failure, at the root or below it, only skips that listing.
    fn classify(&self, e: ignore::Error) -> ScourError {
        match map_ignore_error(e) {
            ScourError::Io { path, source }
                if path == self.root && source.kind() == std::io::ErrorKind::NotFound =>
            {
                ScourError::NotFound(path)
            }
            other => other,
        }
    }
}

impl Source for DirectorySource {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<Entry, ScourError>> + '_> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .same_file_system(false);

        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let walk = builder
            .build()
            // The root itself is never a candidate.
            .filter(|res| res.as_ref().map(|e| e.depth() > 0).unwrap_or(true))
            .map(move |res| res.map(to_entry).map_err(|e| self.classify(e)));

        Box::new(walk)
    }
}

fn to_entry(entry: DirEntry) -> Entry {
    let kind = match entry.file_type() {
        Some(ft) if ft.is_dir() => EntryKind::Dir,
        Some(ft) if ft.is_file() => EntryKind::File,
        // Resolve links so a link to a folder counts as a folder.
        Some(ft) if ft.is_symlink() => match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_dir() => EntryKind::Dir,
            Ok(_) => EntryKind::File,
            Err(_) => EntryKind::Symlink,
        },
        _ => EntryKind::Other,
    };
    let depth = entry.depth();
    Entry::new(entry.into_path(), kind, depth)
}

// ---------------------------------------------------------------------------
// Map ignore::Error to ScourError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> ScourError {
    unwrap_ignore_error(e, None)
}

/// Peel `WithPath`/`WithDepth` layers in any nesting, keeping the outermost path.
fn unwrap_ignore_error(e: ignore::Error, path: Option<PathBuf>) -> ScourError {
    match e {
        ignore::Error::WithPath { path: inner, err } => {
            unwrap_ignore_error(*err, path.or(Some(inner)))
        }
        ignore::Error::WithDepth { err, .. } => unwrap_ignore_error(*err, path),
        ignore::Error::Loop { child, .. } => ScourError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => map_io_error(path.unwrap_or_default(), io_err),
        other => match (path, other.io_error()) {
            (Some(path), Some(io_err)) => {
                map_io_error(path, std::io::Error::new(io_err.kind(), other.to_string()))
            }
            (Some(path), None) => ScourError::Source(format!("{}: {}", path.display(), other)),
            (None, _) => ScourError::Source(other.to_string()),
        },
    }
}

fn map_io_error(path: PathBuf, io_err: std::io::Error) -> ScourError {
    if io_err.kind() == std::io::ErrorKind::PermissionDenied {
        ScourError::PermissionDenied(path)
    } else {
        ScourError::Io { path, source: io_err }
    }
}
