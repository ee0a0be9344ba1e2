//! Query compilation: raw request fields → an immutable matcher.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::entry::{Entry, EntryKind};
use crate::traits::Matcher;

// ---------------------------------------------------------------------------
// Extension categories
// ---------------------------------------------------------------------------

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "doc", "docx", "pdf", "txt", "xlsx", "xls", "pptx", "ppt", "odt", "rtf",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff",
];

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v"];

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma", "opus"];

pub const CODE_EXTENSIONS: &[&str] = &[
    "py", "java", "cpp", "c", "h", "js", "html", "css", "php", "go", "rs",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"];

// ---------------------------------------------------------------------------
// FilterType
// ---------------------------------------------------------------------------

/// The category restricting which entries count as matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    All,
    Documents,
    Images,
    Videos,
    Audio,
    Code,
    Archives,
    FoldersOnly,
}

impl FilterType {
    pub const ALL: [FilterType; 8] = [
        FilterType::All,
        FilterType::Documents,
        FilterType::Images,
        FilterType::Videos,
        FilterType::Audio,
        FilterType::Code,
        FilterType::Archives,
        FilterType::FoldersOnly,
    ];

    /// Allowed extensions, lower-case without the dot. `None` means no restriction.
    pub fn extensions(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Documents => Some(DOCUMENT_EXTENSIONS),
            Self::Images => Some(IMAGE_EXTENSIONS),
            Self::Videos => Some(VIDEO_EXTENSIONS),
            Self::Audio => Some(AUDIO_EXTENSIONS),
            Self::Code => Some(CODE_EXTENSIONS),
            Self::Archives => Some(ARCHIVE_EXTENSIONS),
            Self::All | Self::FoldersOnly => None,
        }
    }

    /// Whether a directory can ever match under this filter.
    pub fn accepts_dirs(self) -> bool {
        matches!(self, Self::All | Self::FoldersOnly)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Files",
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Code => "Code",
            Self::Archives => "Archives",
            Self::FoldersOnly => "Folders Only",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "all" | "allfiles" => Ok(Self::All),
            "documents" | "document" | "docs" => Ok(Self::Documents),
            "images" | "image" => Ok(Self::Images),
            "videos" | "video" => Ok(Self::Videos),
            "audio" => Ok(Self::Audio),
            "code" => Ok(Self::Code),
            "archives" | "archive" => Ok(Self::Archives),
            "foldersonly" | "folders" | "folder" | "dirs" => Ok(Self::FoldersOnly),
            _ => Err(format!("unknown filter type: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// SearchRequest
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_RESULTS: usize = 500;

/// A validated search request. Immutable once a search starts.
///
/// Built through [`SearchBuilder`](crate::SearchBuilder), which rejects an
/// empty query, a missing root and a zero cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub(crate) query:              String,
    pub(crate) root:               PathBuf,
    pub(crate) match_case:         bool,
    pub(crate) include_subfolders: bool,
    pub(crate) max_results:        usize,
    pub(crate) filter:             FilterType,
}

impl SearchRequest {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn match_case(&self) -> bool {
        self.match_case
    }

    pub fn include_subfolders(&self) -> bool {
        self.include_subfolders
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    pub fn compile(&self) -> CompiledQuery {
        CompiledQuery::new(self)
    }
}

// ---------------------------------------------------------------------------
// CompiledQuery
// ---------------------------------------------------------------------------

/// The normalized matcher built from a [`SearchRequest`].
///
/// Runs the filter pipeline in order: hidden skip, folder filter, name match,
/// extension filter.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    needle:     String,
    match_case: bool,
    filter:     FilterType,
    extensions: Option<&'static [&'static str]>,
}

impl CompiledQuery {
    pub fn new(request: &SearchRequest) -> Self {
        let needle = if request.match_case {
            request.query.clone()
        } else {
            request.query.to_lowercase()
        };
        Self {
            needle,
            match_case: request.match_case,
            filter: request.filter,
            extensions: request.filter.extensions(),
        }
    }

    fn name_matches(&self, name: &str) -> bool {
        if self.match_case {
            name.contains(&self.needle)
        } else {
            name.to_lowercase().contains(&self.needle)
        }
    }

    fn extension_allowed(&self, path: &Path) -> bool {
        let Some(allowed) = self.extensions else {
            return true;
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
            .unwrap_or(false)
    }
}

impl Matcher for CompiledQuery {
    fn is_match(&self, entry: &Entry) -> bool {
        if is_hidden(&entry.name) {
            return false;
        }

        let is_dir = entry.kind == EntryKind::Dir;
        if is_dir && !self.filter.accepts_dirs() {
            return false;
        }
        if !is_dir && self.filter == FilterType::FoldersOnly {
            return false;
        }

        if !self.name_matches(&entry.name) {
            return false;
        }

        is_dir || self.extension_allowed(&entry.path)
    }
}

/// Hidden means a leading dot, on every platform.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str, match_case: bool, filter: FilterType) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            root: PathBuf::from("/"),
            match_case,
            include_subfolders: true,
            max_results: DEFAULT_MAX_RESULTS,
            filter,
        }
    }

    fn file(name: &str) -> Entry {
        Entry::new(PathBuf::from("/r").join(name), EntryKind::File, 1)
    }

    fn dir(name: &str) -> Entry {
        Entry::new(PathBuf::from("/r").join(name), EntryKind::Dir, 1)
    }

    #[test]
    fn case_insensitive_by_default() {
        let q = request("foo", false, FilterType::All).compile();
        assert!(q.is_match(&file("FooBar.txt")));
    }

    #[test]
    fn match_case_rejects_different_case() {
        let q = request("foo", true, FilterType::All).compile();
        assert!(!q.is_match(&file("FooBar.txt")));
        assert!(q.is_match(&file("myfoo.txt")));
    }

    #[test]
    fn images_excludes_text_files() {
        let q = request("holiday", false, FilterType::Images).compile();
        assert!(!q.is_match(&file("holiday.txt")));
        assert!(q.is_match(&file("holiday.JPG")));
    }

    #[test]
    fn extension_uses_last_component() {
        let q = request("backup", false, FilterType::Archives).compile();
        assert!(q.is_match(&file("backup.tar.gz")));
        assert!(!q.is_match(&file("backup.gz.txt")));
        assert!(!q.is_match(&file("backup")));
    }

    #[test]
    fn folders_only_rejects_files() {
        let q = request("src", false, FilterType::FoldersOnly).compile();
        assert!(q.is_match(&dir("src")));
        assert!(!q.is_match(&file("src.rs")));
    }

    #[test]
    fn type_filters_reject_directories() {
        let q = request("music", false, FilterType::Audio).compile();
        assert!(!q.is_match(&dir("music.mp3")));
        let all = request("music", false, FilterType::All).compile();
        assert!(all.is_match(&dir("music")));
    }

    #[test]
    fn hidden_entries_never_match() {
        let q = request("git", false, FilterType::All).compile();
        assert!(!q.is_match(&dir(".git")));
        assert!(!q.is_match(&file(".gitignore")));
    }

    #[test]
    fn filter_type_parses_labels() {
        assert_eq!("Folders Only".parse(), Ok(FilterType::FoldersOnly));
        assert_eq!("all files".parse(), Ok(FilterType::All));
        assert_eq!("IMAGES".parse(), Ok(FilterType::Images));
        assert!("spreadsheets".parse::<FilterType>().is_err());
        for f in FilterType::ALL {
            assert_eq!(f.label().parse(), Ok(f));
        }
    }
}
