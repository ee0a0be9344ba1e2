use std::path::PathBuf;

/// A single item produced by a [`Source`](crate::traits::Source) during traversal.
///
/// Entries carry no metadata. Only matched entries are stat-ed, by the
/// batcher.
#[derive(Debug)]
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// The entry's file name.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// How deep in the traversal this entry was found. Root = 0.
    pub depth: usize,
}

impl Entry {
    /// Build an entry, deriving `name` from the last path component.
    pub fn new(path: PathBuf, kind: EntryKind, depth: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            kind,
            depth,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The kind of a traversed entry.
///
/// Symlinks that resolve are reported as what they point to; `Symlink` is
/// left for dangling links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link whose target could not be resolved.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

/// One matched entry as delivered to the consumer.
///
/// Created by the producer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub name:             String,
    pub parent_path:      PathBuf,
    /// Raw size used for sorting; 0 for directories and unreadable entries.
    pub size_bytes:       u64,
    pub size_display:     String,
    /// Empty when metadata could not be read.
    pub modified_display: String,
    pub full_path:        PathBuf,
    pub is_directory:     bool,
}

impl ResultRecord {
    pub fn parent_display(&self) -> String {
        self.parent_path.display().to_string()
    }
}
