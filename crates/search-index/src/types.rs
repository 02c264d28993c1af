//! Entry, stats, and result types for the search index.
//!
//! These are the core types shared between the crawler and the query
//! engine. The consuming UI layer serializes them as-is.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::search::normalize;

/// Filesystem object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        }
    }
}

bitflags::bitflags! {
    /// Subset of entry kinds admitted into search results.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindSet: u8 {
        const FILE = 1;
        const DIRECTORY = 1 << 1;
        const SYMLINK = 1 << 2;
    }
}

impl KindSet {
    pub fn allows(self, kind: EntryKind) -> bool {
        self.contains(Self::from(kind))
    }
}

impl From<EntryKind> for KindSet {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => Self::FILE,
            EntryKind::Directory => Self::DIRECTORY,
            EntryKind::Symlink => Self::SYMLINK,
        }
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::all()
    }
}

// On the wire a kind set is a plain list of kinds, which keeps config
// payloads readable.
impl Serialize for KindSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kinds: Vec<EntryKind> = [EntryKind::File, EntryKind::Directory, EntryKind::Symlink]
            .into_iter()
            .filter(|kind| self.allows(*kind))
            .collect();
        kinds.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KindSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kinds = Vec::<EntryKind>::deserialize(deserializer)?;
        Ok(kinds
            .into_iter()
            .fold(Self::empty(), |set, kind| set | Self::from(kind)))
    }
}

/// One row per filesystem object observed by the crawler.
///
/// Keyed by `path`; a later crawl of the same path overwrites the row.
/// Rows are never removed when the underlying object disappears; the
/// index goes stale until an explicit clear or refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    /// Absolute path, the unique key.
    pub path: String,
    /// Display name, exactly as listed.
    pub name: String,
    /// Lower-cased name with non-alphanumeric code points stripped.
    /// Used only for matching, never displayed.
    pub normalized_name: String,
    pub kind: EntryKind,
    /// Size in bytes.
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub modified_at: u64,
    /// Directory this entry was discovered under.
    pub parent_path: String,
}

impl IndexEntry {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        kind: EntryKind,
        size: u64,
        modified_at: u64,
        parent_path: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let normalized_name = normalize(&name);
        Self {
            path: path.into(),
            name,
            normalized_name,
            kind,
            size,
            modified_at,
            parent_path: parent_path.into(),
        }
    }
}

/// Aggregate index counters, written only by the crawler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexStats {
    pub total_files: usize,
    pub total_directories: usize,
    /// Roots that completed a depth-0 crawl, in first-crawled order.
    pub crawled_roots: Vec<String>,
    /// Unix timestamp of the most recent completed root crawl.
    pub last_index_time: Option<u64>,
    /// Non-fatal listing failures observed while crawling.
    pub errors: usize,
    pub is_indexing: bool,
}

/// How a result matched the query, derived from the pre-bonus score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Prefix,
    Fuzzy,
    Content,
}

/// One ranked search hit. Built per query, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    pub entry: IndexEntry,
    pub score: f64,
    pub match_kind: MatchKind,
    /// Display name with the first matched substring marked.
    pub highlighted_name: String,
}

/// Current Unix timestamp in seconds.
pub(crate) fn unix_now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
