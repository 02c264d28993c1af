//! Cancellation for in-flight crawls.
//!
//! An accidental crawl of a huge tree should not have to run to
//! completion. Bumping the generation cancels every token minted for an
//! older one, and crawls check their token at each directory boundary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks the active crawl generation.
#[derive(Debug, Default)]
pub struct CrawlGenerations {
    active: Arc<AtomicU64>,
}

impl CrawlGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a token tied to the current generation.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            active: Arc::clone(&self.active),
            generation: self.active.load(Ordering::SeqCst),
        }
    }

    /// Cancels every token minted so far. Tokens minted afterwards are live.
    pub fn cancel_all(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token checked by crawls between directory listings.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    active: Arc<AtomicU64>,
    generation: u64,
}

impl CancellationToken {
    /// A token that is never cancelled, for callers that do not need one.
    pub fn noop() -> Self {
        Self {
            active: Arc::new(AtomicU64::new(0)),
            generation: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.generation != self.active.load(Ordering::Relaxed)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::noop()
    }
}
