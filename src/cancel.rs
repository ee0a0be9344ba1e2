//! Cancellation and search generations.
//!
//! A [`CancellationToken`] is the only mutable state shared with a producer
//! besides the message channel. The consumer sets it; the producer polls it
//! before every entry, so a cancel is observed within one enumeration step.
//!
//! Every search is also stamped with a [`Generation`]. Producers tag each
//! message with theirs, and the consumer drops messages from older
//! generations, so a producer that has not yet noticed its cancellation can
//! never leak results into the next search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Identifies one search invocation within a session.
pub type Generation = u64;

/// A shared cancellation flag.
///
/// Cloning yields a handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a cooperative stop. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
