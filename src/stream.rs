//! The message protocol between a search producer and its consumer.
//!
//! A stream is zero or more `Batch` messages followed by exactly one terminal
//! message, `Done` or `Error`. Every message travels inside a `SearchEvent`
//! carrying the generation of the search that produced it.

use crate::cancel::Generation;
use crate::entry::ResultRecord;

/// Number of records in every batch but the last.
pub const BATCH_SIZE: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMessage {
    /// 1..=BATCH_SIZE records, in discovery order.
    Batch(Vec<ResultRecord>),
    /// Normal completion, including cancellation and hitting the cap.
    Done(usize),
    /// A systemic failure ended the search.
    Error(String),
}

impl StreamMessage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Error(_))
    }
}

/// A [`StreamMessage`] stamped with the generation of the search that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub generation: Generation,
    pub message:    StreamMessage,
}
