use crate::entry::Entry;
use crate::error::ScourError;

/// A lazy, finite sequence of entries to search through.
///
/// The filesystem implementation is [`DirectorySource`](crate::DirectorySource);
/// tests and embedders can supply anything else that yields [`Entry`] values.
///
/// # Thread Safety
///
/// `Send` is required: the source is moved into the producer thread and
/// `walk()` is called there. The returned iterator never leaves that thread.
///
/// # Error Handling
///
/// Failures confined to one listing (permission denied, unreadable
/// directory) should be yielded as recoverable errors (see
/// [`ScourError::is_recoverable`]). The engine skips those and keeps walking.
/// Any other error ends the search with an `Error` message.
///
/// # Example
///
/// ```rust
/// use scour::{Entry, EntryKind, ScourError, Source};
///
/// struct VecSource(Vec<&'static str>);
///
/// impl Source for VecSource {
///     fn walk(&self) -> Box<dyn Iterator<Item = Result<Entry, ScourError>> + '_> {
///         Box::new(self.0.iter().map(|name| Ok(Entry::new(name.into(), EntryKind::File, 1))))
///     }
/// }
/// ```
pub trait Source: Send {
    /// Traverse the source and yield entries in discovery order.
    ///
    /// Called once per search; the sequence is not restartable.
    fn walk(&self) -> Box<dyn Iterator<Item = Result<Entry, ScourError>> + '_>;
}

/// Determines whether an entry is a match.
///
/// The built-in implementation is [`CompiledQuery`](crate::CompiledQuery).
pub trait Matcher: Send + Sync {
    /// Returns `true` if this entry should be included in results.
    fn is_match(&self, entry: &Entry) -> bool;
}
