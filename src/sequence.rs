//! Monotonic request tagging.
//!
//! Poll ticks and operator overrides race for the same render target and
//! responses can complete out of order. Every request takes a ticket when it
//! is issued; a response is rendered only if its ticket is newer than the
//! last one rendered, so a slow stale response can never paint over a newer
//! one. Requests themselves are never cancelled.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SequenceGuard {
    issued: AtomicU64,
    rendered: AtomicU64,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next ticket. Tickets start at 1 and strictly increase.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the render slot for `ticket`.
    ///
    /// Returns `false` if an equal or newer ticket has already been
    /// accepted; the caller must then drop its response.
    pub fn accept(&self, ticket: u64) -> bool {
        self.rendered.fetch_max(ticket, Ordering::SeqCst) < ticket
    }

    /// Highest ticket accepted so far (0 if none).
    pub fn last_rendered(&self) -> u64 {
        self.rendered.load(Ordering::SeqCst)
    }

    pub fn last_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}
