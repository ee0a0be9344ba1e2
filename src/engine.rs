use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Sender;
use log::{debug, info, warn};

use crate::cancel::{CancellationToken, Generation};
use crate::entry::{Entry, EntryKind, ResultRecord};
use crate::error::ScourError;
use crate::format::{format_modified, format_size, DIR_SIZE_DISPLAY};
use crate::results::ScanStats;
use crate::stream::{SearchEvent, StreamMessage, BATCH_SIZE};
use crate::traits::{Matcher, Source};

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Everything a producer needs besides its source and matcher.
pub(crate) struct EngineOptions {
    pub generation:  Generation,
    pub max_results: usize,
    pub token:       CancellationToken,
    pub sender:      Sender<SearchEvent>,
}

// ---------------------------------------------------------------------------
// spawn() / produce()
// ---------------------------------------------------------------------------

/// Start the single producer thread for one search.
pub(crate) fn spawn(
    source: Box<dyn Source>,
    matcher: Box<dyn Matcher>,
    opts: EngineOptions,
) -> Result<JoinHandle<()>, ScourError> {
    thread::Builder::new()
        .name(format!("scour-search-{}", opts.generation))
        .spawn(move || produce(source.as_ref(), matcher.as_ref(), &opts))
        .map_err(ScourError::Spawn)
}

/// Run one search to completion and send its terminal message.
///
/// Exactly one `Done` or `Error` is sent, even if the walk panics. Matches
/// found before a failure are flushed ahead of the `Error`.
pub(crate) fn produce(source: &dyn Source, matcher: &dyn Matcher, opts: &EngineOptions) {
    let mut batcher = Batcher::new(opts.generation, &opts.sender);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(source, matcher, opts, &mut batcher)));

    let terminal = match outcome {
        Ok(Ok(())) => StreamMessage::Done(batcher.total()),
        Ok(Err(err)) => {
            warn!("search {} failed: {}", opts.generation, err);
            batcher.flush();
            StreamMessage::Error(err.to_string())
        }
        Err(payload) => {
            let err = ScourError::WorkerPanicked(panic_message(payload.as_ref()));
            warn!("search {} aborted: {}", opts.generation, err);
            batcher.flush();
            StreamMessage::Error(err.to_string())
        }
    };

    // A closed channel means nobody is listening any more.
    let _ = opts.sender.send(SearchEvent {
        generation: opts.generation,
        message:    terminal,
    });
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk, filter and batch.
///
/// Stops before pulling the next entry once the token is set or the cap is
/// reached. Recoverable source errors skip that listing; anything else is
/// returned and becomes the stream's `Error`.
fn run(
    source: &dyn Source,
    matcher: &dyn Matcher,
    opts: &EngineOptions,
    batcher: &mut Batcher<'_>,
) -> Result<(), ScourError> {
    let start = Instant::now();
    let mut files = 0usize;
    let mut dirs = 0usize;

    let mut walk = source.walk();
    loop {
        if opts.token.is_cancelled() {
            debug!("search {} cancelled after {} matches", opts.generation, batcher.total());
            break;
        }
        if batcher.total() >= opts.max_results {
            debug!("search {} reached its cap of {}", opts.generation, opts.max_results);
            break;
        }

        let entry = match walk.next() {
            Some(Ok(entry)) => entry,
            Some(Err(err)) if err.is_recoverable() => {
                debug!("skipped: {}", err);
                continue;
            }
            Some(Err(err)) => return Err(err),
            None => break,
        };

        match entry.kind {
            EntryKind::Dir => dirs += 1,
            _ => files += 1,
        }

        if !matcher.is_match(&entry) {
            continue;
        }

        if !batcher.push(to_record(entry)) {
            debug!("search {}: consumer went away", opts.generation);
            break;
        }
    }

    batcher.flush();

    let stats = ScanStats::compute(files, dirs, start.elapsed());
    info!(
        "search {} finished: {} matches, {} files, {} dirs in {:.3}s ({} entries/s)",
        opts.generation,
        batcher.total(),
        stats.files,
        stats.dirs,
        stats.duration.as_secs_f64(),
        stats.entries_per_sec,
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Batcher
// ---------------------------------------------------------------------------

/// Buffers records and sends them in groups of [`BATCH_SIZE`].
struct Batcher<'a> {
    generation: Generation,
    sender:     &'a Sender<SearchEvent>,
    buffer:     Vec<ResultRecord>,
    total:      usize,
}

impl<'a> Batcher<'a> {
    fn new(generation: Generation, sender: &'a Sender<SearchEvent>) -> Self {
        Self {
            generation,
            sender,
            buffer: Vec::with_capacity(BATCH_SIZE),
            total: 0,
        }
    }

    fn total(&self) -> usize {
        self.total
    }

    /// Returns `false` once the receiving side has been dropped.
    fn push(&mut self, record: ResultRecord) -> bool {
        self.buffer.push(record);
        self.total += 1;
        if self.buffer.len() == BATCH_SIZE {
            return self.flush();
        }
        true
    }

    fn flush(&mut self) -> bool {
        if self.buffer.is_empty() {
            return true;
        }
        let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(BATCH_SIZE));
        self.sender
            .send(SearchEvent {
                generation: self.generation,
                message:    StreamMessage::Batch(batch),
            })
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Turn a matched entry into a record, stat-ing it on the way.
///
/// A failed stat is not a dropped result: the record keeps blank metadata.
fn to_record(entry: Entry) -> ResultRecord {
    let is_directory = entry.is_dir();
    let stat = fs::metadata(&entry.path).and_then(|meta| Ok((meta.len(), meta.modified()?)));
    let (size_bytes, size_display, modified_display) = match stat {
        Ok((_, modified)) if is_directory => (0, DIR_SIZE_DISPLAY.to_string(), format_modified(modified)),
        Ok((len, modified)) => (len, format_size(len), format_modified(modified)),
        Err(err) => {
            debug!("no metadata for {}: {}", entry.path.display(), err);
            let size_display = if is_directory { DIR_SIZE_DISPLAY } else { "" };
            (0, size_display.to_string(), String::new())
        }
    };

    ResultRecord {
        parent_path: entry.path.parent().map(Path::to_path_buf).unwrap_or_default(),
        name: entry.name,
        size_bytes,
        size_display,
        modified_display,
        full_path: entry.path,
        is_directory,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
