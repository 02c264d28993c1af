//! In-memory filesystem indexing and fuzzy relevance search.
//!
//! This crate powers global search across a filesystem tree:
//! - background crawling with depth and exclusion control
//! - a path-keyed in-memory index store
//! - a layered relevance scorer (exact, prefix, substring,
//!   edit-distance fuzzy)
//! - incremental re-indexing via explicit refresh
//!
//! It is an in-process library. Directory listings come from a
//! [`DirectoryLister`] collaborator (a remote filesystem service in
//! production, [`LocalDirectoryLister`] for local trees), and ranked
//! [`SearchResultItem`]s go to whatever UI consumes them. The index is
//! never persisted and goes stale by design; callers refresh explicitly.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod listing;
pub mod protected;
pub mod search;
pub mod types;

pub use cancel::{CancellationToken, CrawlGenerations};
pub use config::{SearchConfig, SearchConfigPatch};
pub use engine::SearchEngine;
pub use error::DirectoryAccessError;
pub use index::{IndexStore, INITIAL_CRAWL_DEPTH, REFRESH_CRAWL_DEPTH};
pub use listing::{
    DirectoryLister, DirectoryListing, EntryPermissions, ListedEntry, LocalDirectoryLister,
};
pub use protected::ProtectedPathRegistry;
pub use search::{highlight, levenshtein, normalize, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
pub use types::{EntryKind, IndexEntry, IndexStats, KindSet, MatchKind, SearchResultItem};
