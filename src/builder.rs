use std::path::PathBuf;
use std::thread::JoinHandle;

use crate::engine::{self, EngineOptions};
use crate::error::ScourError;
use crate::query::{FilterType, SearchRequest, DEFAULT_MAX_RESULTS};
use crate::results::Results;
use crate::session::{CollectingObserver, SearchSession};
use crate::source::DirectorySource;
use crate::traits::Source;

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a search.
///
/// Created via [`scour::search()`](crate::search). Configure with chained
/// builder methods, then either hand [`build()`](SearchBuilder::build)'s
/// result to a [`SearchSession`] for streaming, or call
/// [`run()`](SearchBuilder::run) to block until the search completes.
///
/// # Example
///
/// ```rust,ignore
/// let search = scour::search()
///     .query("invoice")
///     .root("/home/me/Documents")
///     .filter(FilterType::Documents)
///     .max_results(100)
///     .build()?;
/// let generation = session.start(search)?;
/// ```
pub struct SearchBuilder {
    query:              String,
    root:               PathBuf,
    match_case:         bool,
    include_subfolders: bool,
    max_results:        usize,
    filter:             FilterType,
    source:             Option<Box<dyn Source>>,
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            query:              String::new(),
            root:               PathBuf::from("."),
            match_case:         false,
            include_subfolders: true,
            max_results:        DEFAULT_MAX_RESULTS,
            filter:             FilterType::All,
            source:             None,
        }
    }
}

impl SearchBuilder {
    // ── Query ─────────────────────────────────────────────────────────────

    /// The substring to look for in entry names. Surrounding whitespace is
    /// trimmed; an empty query is rejected by [`build()`](Self::build).
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Compare names case-sensitively. Off by default.
    pub fn match_case(mut self, yes: bool) -> Self {
        self.match_case = yes;
        self
    }

    /// Restrict matches to a category of entries.
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    // ── Location ──────────────────────────────────────────────────────────

    /// Directory to search under. Defaults to the current directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Descend into subfolders. On by default; when off only the root's
    /// immediate children are considered.
    pub fn include_subfolders(mut self, yes: bool) -> Self {
        self.include_subfolders = yes;
        self
    }

    /// Replace the filesystem walker with any other [`Source`].
    ///
    /// The root is not checked for existence when a custom source is set.
    pub fn source(mut self, s: impl Source + 'static) -> Self {
        self.source = Some(Box::new(s));
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Stop after `n` matches. Must be greater than zero.
    pub fn max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Validate the input and produce a search ready to be started.
    ///
    /// # Errors
    ///
    /// [`ScourError::EmptyQuery`], [`ScourError::InvalidMaxResults`], or
    /// [`ScourError::RootNotFound`] when the filesystem walker would be used
    /// on a path that does not exist.
    pub fn build(self) -> Result<PreparedSearch, ScourError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ScourError::EmptyQuery);
        }
        if self.max_results == 0 {
            return Err(ScourError::InvalidMaxResults(self.max_results));
        }

        let source: Box<dyn Source> = match self.source {
            Some(s) => s,
            None => {
                if !self.root.exists() {
                    return Err(ScourError::RootNotFound(self.root));
                }
                Box::new(DirectorySource::new(self.root.clone(), self.include_subfolders))
            }
        };

        Ok(PreparedSearch {
            request: SearchRequest {
                query:              query.to_string(),
                root:               self.root,
                match_case:         self.match_case,
                include_subfolders: self.include_subfolders,
                max_results:        self.max_results,
                filter:             self.filter,
            },
            source,
        })
    }

    /// Run the search and block until it completes.
    ///
    /// Uses a private [`SearchSession`], so the results arrive the same way
    /// an interactive consumer would see them.
    ///
    /// # Errors
    ///
    /// Validation errors from [`build()`](Self::build), and
    /// [`ScourError::Search`] if the search itself failed.
    pub fn run(self) -> Result<Results, ScourError> {
        let search = self.build()?;
        let mut session = SearchSession::new();
        let mut observer = CollectingObserver::default();

        session.start(search)?;
        session.wait_idle(&mut observer);

        if let Some(message) = observer.error {
            return Err(ScourError::Search(message));
        }

        let completion = session.completion().unwrap_or_default();
        Ok(Results {
            matches:       completion.count,
            records:       session.results().records().to_vec(),
            limit_reached: completion.limit_reached,
            duration:      completion.elapsed,
        })
    }
}

// ---------------------------------------------------------------------------
// PreparedSearch
// ---------------------------------------------------------------------------

/// A validated request together with the source it will walk.
pub struct PreparedSearch {
    request: SearchRequest,
    source:  Box<dyn Source>,
}

impl PreparedSearch {
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub(crate) fn spawn(self, opts: EngineOptions) -> Result<JoinHandle<()>, ScourError> {
        let matcher = self.request.compile();
        engine::spawn(self.source, Box::new(matcher), opts)
    }
}
