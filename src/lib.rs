//! # scour
//!
//! Streaming, cancellable file-name search.
//!
//! A search walks a directory (recursively or one level deep) on a single
//! background thread, keeps the entries whose name contains the query, and
//! streams them back in batches of [`BATCH_SIZE`] while the walk is still
//! running. The consumer, a [`SearchSession`], drains those batches on its own
//! schedule without blocking and can cancel the walk at any time.
//!
//! Names are matched, never contents, and nothing is indexed or cached: every
//! search is a fresh traversal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scour::FilterType;
//!
//! let results = scour::search()
//!     .query("invoice")
//!     .root("/home/me/Documents")
//!     .filter(FilterType::Documents)
//!     .max_results(100)
//!     .run()
//!     .unwrap();
//!
//! println!("{} matches in {:.3}s", results.matches, results.duration.as_secs_f64());
//! ```
//!
//! # Streaming
//!
//! ```rust,no_run
//! use scour::{ResultRecord, SearchObserver, SearchSession};
//!
//! struct Printer;
//!
//! impl SearchObserver for Printer {
//!     fn on_batch(&mut self, batch: &[ResultRecord], total: usize) {
//!         for record in batch {
//!             println!("{}", record.full_path.display());
//!         }
//!         println!("-- {total} so far");
//!     }
//! }
//!
//! let mut session = SearchSession::new();
//! session.start(scour::search().query("report").root(".").build().unwrap()).unwrap();
//!
//! let ticks = scour::ticker();
//! while session.is_busy() {
//!     ticks.recv().unwrap();
//!     session.drain(&mut Printer);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod actions;
pub mod format;

mod builder;
mod cancel;
mod engine;
mod entry;
mod error;
mod query;
mod results;
mod session;
mod sort;
mod source;
mod stream;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::{PreparedSearch, SearchBuilder};
pub use cancel::{CancellationToken, Generation};
pub use entry::{Entry, EntryKind, ResultRecord};
pub use error::ScourError;
pub use query::{CompiledQuery, FilterType, SearchRequest, DEFAULT_MAX_RESULTS};
pub use results::{ResultSet, Results, ScanStats};
pub use session::{ticker, Completion, SearchObserver, SearchSession, SessionState, TICK_INTERVAL};
pub use sort::Column;
pub use source::DirectorySource;
pub use stream::{SearchEvent, StreamMessage, BATCH_SIZE};
pub use traits::{Matcher, Source};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure a search.
///
/// # Example
///
/// ```rust
/// use scour::{Entry, EntryKind, ScourError, Source};
///
/// struct NameSource(Vec<&'static str>);
///
/// impl Source for NameSource {
///     fn walk(&self) -> Box<dyn Iterator<Item = Result<Entry, ScourError>> + '_> {
///         Box::new(self.0.iter().map(|name| Ok(Entry::new(name.into(), EntryKind::File, 1))))
///     }
/// }
///
/// let results = scour::search()
///     .source(NameSource(vec!["invoice.txt", "report.txt"]))
///     .query("invoice")
///     .run()
///     .unwrap();
///
/// assert_eq!(results.matches, 1);
/// ```
pub fn search() -> SearchBuilder {
    SearchBuilder::default()
}
