use std::time::Duration;

use crate::entry::ResultRecord;
use crate::sort::{sort_indices, Column};

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// The consumer-owned, append-only set of records for the current search.
///
/// Records are stored in arrival order and never reordered. Sorting only
/// changes the presentation order returned by [`rows`](ResultSet::rows);
/// records appended after a sort go to the end of that order.
#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
    order:   Vec<usize>,
    sorted:  Option<Column>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a delivered batch, preserving its order.
    pub fn extend(&mut self, batch: Vec<ResultRecord>) {
        for record in batch {
            self.order.push(self.records.len());
            self.records.push(record);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
        self.sorted = None;
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Records in presentation order.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRecord> + '_ {
        self.order.iter().map(|&i| &self.records[i])
    }

    /// The record shown at `row` in presentation order.
    pub fn row(&self, row: usize) -> Option<&ResultRecord> {
        self.order.get(row).map(|&i| &self.records[i])
    }

    /// Reorder the presentation without touching the records.
    pub fn sort_by(&mut self, column: Column) {
        sort_indices(&self.records, &mut self.order, column);
        self.sorted = Some(column);
    }

    /// The column of the last sort, if any.
    pub fn sorted_by(&self) -> Option<Column> {
        self.sorted
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// The output of a search run to completion with
/// [`SearchBuilder::run`](crate::SearchBuilder::run).
#[derive(Debug)]
pub struct Results {
    /// Total number of delivered records, as reported by `Done`.
    pub matches: usize,

    /// Every delivered record, in discovery order.
    pub records: Vec<ResultRecord>,

    /// Whether the search stopped because it hit its cap.
    pub limit_reached: bool,

    /// Wall-clock time from spawn to the terminal message.
    pub duration: Duration,
}

// ---------------------------------------------------------------------------
// ScanStats
// ---------------------------------------------------------------------------

/// Walk statistics computed by the producer and logged on completion.
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    /// Entries seen that were not directories (matched or not).
    pub files: usize,

    /// Directories seen.
    pub dirs: usize,

    /// Wall-clock time of the walk.
    pub duration: Duration,

    /// `(files + dirs) / duration`, 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(files: usize, dirs: usize, duration: Duration) -> Self {
        let total = files + dirs;
        let eps = if duration.as_secs_f64() > 0.0 {
            (total as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            files,
            dirs,
            duration,
            entries_per_sec: eps,
        }
    }
}
