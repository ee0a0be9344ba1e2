//! The consumer side: a search session owning the materialized result set.
//!
//! A [`SearchSession`] never blocks on a producer. A front end calls
//! [`drain`](SearchSession::drain) on every tick of its own loop (see
//! [`TICK_INTERVAL`] and [`ticker`]); each call applies everything currently
//! queued and reports it to a [`SearchObserver`].
//!
//! Only one search is current at a time. Starting a new one cancels the
//! previous producer and bumps the generation; anything the old producer
//! still sends is discarded on arrival.

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};

use crate::builder::PreparedSearch;
use crate::cancel::{CancellationToken, Generation};
use crate::engine::EngineOptions;
use crate::entry::ResultRecord;
use crate::error::ScourError;
use crate::results::ResultSet;
use crate::sort::Column;
use crate::stream::{SearchEvent, StreamMessage};

/// How often a front end should drain the session.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// A channel that fires every [`TICK_INTERVAL`].
pub fn ticker() -> Receiver<Instant> {
    crossbeam_channel::tick(TICK_INTERVAL)
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Receives state changes as the session applies them.
///
/// Every method has an empty default, so adapters implement only what they
/// display.
pub trait SearchObserver {
    /// A batch was appended. `total` is the record count after appending.
    fn on_batch(&mut self, _batch: &[ResultRecord], _total: usize) {}

    /// The search finished normally, was cancelled, or hit its cap.
    fn on_done(&mut self, _completion: &Completion) {}

    /// The search failed. Records already delivered stay in the set.
    fn on_error(&mut self, _message: &str) {}
}

impl SearchObserver for () {}

/// Remembers the terminal outcome; used by the blocking API.
#[derive(Debug, Default)]
pub(crate) struct CollectingObserver {
    pub error: Option<String>,
}

impl SearchObserver for CollectingObserver {
    fn on_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching,
    /// Cancel requested, terminal message not yet drained.
    Cancelling,
}

/// Summary of a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completion {
    pub count:         usize,
    pub limit_reached: bool,
    pub elapsed:       Duration,
}

impl Completion {
    /// `"Found N results"`, with `" (limit reached)"` when capped.
    pub fn summary(&self) -> String {
        let mut text = format!("Found {} results", self.count);
        if self.limit_reached {
            text.push_str(" (limit reached)");
        }
        text
    }
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

pub struct SearchSession {
    sender:      Sender<SearchEvent>,
    receiver:    Receiver<SearchEvent>,
    generation:  Generation,
    token:       Option<CancellationToken>,
    state:       SessionState,
    results:     ResultSet,
    max_results: usize,
    started:     Option<Instant>,
    completion:  Option<Completion>,
    status:      String,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            generation: 0,
            token: None,
            state: SessionState::Idle,
            results: ResultSet::new(),
            max_results: 0,
            started: None,
            completion: None,
            status: "Ready".to_string(),
        }
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Start a search, replacing any current one.
    ///
    /// A search still running is cancelled first and its late messages are
    /// ignored. The result set is cleared.
    ///
    /// # Errors
    ///
    /// [`ScourError::Spawn`] if the producer thread could not be started; the
    /// session is left idle.
    pub fn start(&mut self, search: PreparedSearch) -> Result<Generation, ScourError> {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }

        self.generation += 1;
        let token = CancellationToken::new();
        let request = search.request();
        info!(
            "search {}: {:?} under {} (filter: {}, subfolders: {}, match case: {}, max: {})",
            self.generation,
            request.query(),
            request.root().display(),
            request.filter(),
            request.include_subfolders(),
            request.match_case(),
            request.max_results(),
        );

        self.max_results = request.max_results();
        self.results.clear();
        self.completion = None;

        let opts = EngineOptions {
            generation:  self.generation,
            max_results: self.max_results,
            token:       token.clone(),
            sender:      self.sender.clone(),
        };

        match search.spawn(opts) {
            // The producer runs detached; its terminal message is the join point.
            Ok(_handle) => {
                self.token = Some(token);
                self.state = SessionState::Searching;
                self.started = Some(Instant::now());
                self.status = "Searching...".to_string();
                Ok(self.generation)
            }
            Err(err) => {
                self.state = SessionState::Idle;
                self.status = err.to_string();
                Err(err)
            }
        }
    }

    /// Ask the current producer to stop. Returns `false` when idle.
    ///
    /// The search still ends with a `Done` carrying what was found so far.
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Searching {
            return false;
        }
        if let Some(token) = &self.token {
            token.cancel();
        }
        self.state = SessionState::Cancelling;
        self.status = "Cancelling...".to_string();
        true
    }

    /// Drop the current results. A running search keeps appending.
    pub fn clear(&mut self) {
        self.results.clear();
        self.completion = None;
        if self.state == SessionState::Idle {
            self.status = "Ready".to_string();
        }
    }

    pub fn sort_by(&mut self, column: Column) {
        self.results.sort_by(column);
    }

    // ── Drain ─────────────────────────────────────────────────────────────

    /// Apply every message currently queued, without blocking.
    ///
    /// Returns the number of messages applied; stale ones are not counted.
    pub fn drain(&mut self, observer: &mut dyn SearchObserver) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            if event.generation != self.generation {
                debug!(
                    "dropping {} message from stale search {}",
                    if event.message.is_terminal() { "terminal" } else { "batch" },
                    event.generation
                );
                continue;
            }
            self.apply(event.message, observer);
            applied += 1;
        }
        applied
    }

    /// Drain on every tick until the current search has finished.
    ///
    /// Returns immediately when idle.
    pub fn wait_idle(&mut self, observer: &mut dyn SearchObserver) {
        let ticks = ticker();
        self.drain(observer);
        while self.is_busy() {
            // The ticker never disconnects while `ticks` is alive.
            let _ = ticks.recv();
            self.drain(observer);
        }
    }

    fn apply(&mut self, message: StreamMessage, observer: &mut dyn SearchObserver) {
        match message {
            StreamMessage::Batch(batch) => {
                let total = self.results.len() + batch.len();
                observer.on_batch(&batch, total);
                self.results.extend(batch);
                if self.state == SessionState::Searching {
                    self.status = format!("Found {total} results...");
                }
            }
            StreamMessage::Done(count) => {
                let completion = Completion {
                    count,
                    limit_reached: count >= self.max_results,
                    elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
                };
                info!("search {}: {}", self.generation, completion.summary());
                self.finish();
                self.status = "Search complete".to_string();
                self.completion = Some(completion);
                observer.on_done(&completion);
            }
            StreamMessage::Error(message) => {
                self.finish();
                self.status = format!("Search error: {message}");
                observer.on_error(&message);
            }
        }
    }

    fn finish(&mut self) {
        self.state = SessionState::Idle;
        self.token = None;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Outcome of the last finished search, if it ended with `Done`.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// One-line status for a status bar.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the status line, e.g. after a front-end action.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, event: SearchEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, EntryKind};
    use crate::traits::Source;
    use std::path::PathBuf;

    struct Names(usize);

    impl Source for Names {
        fn walk(&self) -> Box<dyn Iterator<Item = Result<Entry, ScourError>> + '_> {
            Box::new((0..self.0).map(|i| {
                Ok(Entry::new(PathBuf::from(format!("/v/match{i:03}.txt")), EntryKind::File, 1))
            }))
        }
    }

    fn prepared(count: usize, max: usize) -> PreparedSearch {
        crate::search()
            .query("match")
            .source(Names(count))
            .max_results(max)
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        batches: Vec<usize>,
        done:    Option<Completion>,
        errors:  Vec<String>,
    }

    impl SearchObserver for Recorder {
        fn on_batch(&mut self, batch: &[ResultRecord], _total: usize) {
            self.batches.push(batch.len());
        }
        fn on_done(&mut self, completion: &Completion) {
            self.done = Some(*completion);
        }
        fn on_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    #[test]
    fn idle_session_drains_nothing() {
        let mut session = SearchSession::new();
        assert_eq!(session.drain(&mut ()), 0);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.status(), "Ready");
        assert!(!session.cancel());
    }

    #[test]
    fn thirty_matches_arrive_as_two_batches() {
        let mut session = SearchSession::new();
        let mut rec = Recorder::default();
        session.start(prepared(30, 500)).unwrap();
        session.wait_idle(&mut rec);

        assert_eq!(rec.batches, vec![25, 5]);
        let done = rec.done.unwrap();
        assert_eq!(done.count, 30);
        assert!(!done.limit_reached);
        assert_eq!(session.results().len(), 30);
        assert_eq!(session.status(), "Search complete");
        assert_eq!(done.summary(), "Found 30 results");
    }

    #[test]
    fn cap_is_reported_as_limit_reached() {
        let mut session = SearchSession::new();
        let mut rec = Recorder::default();
        session.start(prepared(50, 10)).unwrap();
        session.wait_idle(&mut rec);

        assert_eq!(rec.batches, vec![10]);
        let done = session.completion().unwrap();
        assert_eq!(done.count, 10);
        assert!(done.limit_reached);
        assert_eq!(done.summary(), "Found 10 results (limit reached)");
    }

    #[test]
    fn stale_generations_are_discarded() {
        let mut session = SearchSession::new();
        let generation = session.start(prepared(0, 5)).unwrap();
        session.wait_idle(&mut ());
        assert_eq!(session.completion().map(|c| c.count), Some(0));

        session.inject(SearchEvent {
            generation: generation - 1,
            message: StreamMessage::Batch(vec![]),
        });
        session.inject(SearchEvent {
            generation: generation - 1,
            message: StreamMessage::Error("old".into()),
        });
        let mut rec = Recorder::default();
        assert_eq!(session.drain(&mut rec), 0);
        assert!(rec.errors.is_empty());
        assert_eq!(session.status(), "Search complete");
    }

    #[test]
    fn error_keeps_delivered_records() {
        let mut session = SearchSession::new();
        let generation = session.start(prepared(3, 5)).unwrap();
        session.wait_idle(&mut ());

        // Simulate a follow-up failure for a search that already delivered.
        session.state = SessionState::Searching;
        session.inject(SearchEvent {
            generation,
            message: StreamMessage::Error("disk vanished".into()),
        });
        let mut rec = Recorder::default();
        session.drain(&mut rec);

        assert_eq!(rec.errors, vec!["disk vanished".to_string()]);
        assert_eq!(session.results().len(), 3);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.status(), "Search error: disk vanished");
    }

    #[test]
    fn clear_resets_status_when_idle() {
        let mut session = SearchSession::new();
        session.start(prepared(2, 5)).unwrap();
        session.wait_idle(&mut ());
        session.clear();
        assert!(session.results().is_empty());
        assert_eq!(session.completion(), None);
        assert_eq!(session.status(), "Ready");
    }
}
