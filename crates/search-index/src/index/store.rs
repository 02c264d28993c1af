//! The in-memory index: the engine's only shared mutable state.

use std::sync::atomic::{AtomicBool, Ordering};

use fnv::FnvHashMap;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::types::{EntryKind, IndexEntry, IndexStats};

#[derive(Debug, Default)]
struct StoreInner {
    entries: FnvHashMap<String, IndexEntry>,
    total_files: usize,
    total_directories: usize,
    crawled_roots: Vec<String>,
    last_index_time: Option<u64>,
    errors: usize,
}

/// Path-keyed index of everything the crawler has observed.
///
/// The crawler is the sole writer; queries and stats observers read under
/// the shared lock. Entries are never removed when the filesystem object
/// disappears; only [`IndexStore::clear`] replaces the set.
#[derive(Debug, Default)]
pub struct IndexStore {
    inner: RwLock<StoreInner>,
    is_indexing: AtomicBool,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry at `entry.path` (last write wins).
    /// Counters track index content: a replacement does not double-count,
    /// and a replacement that changes kind moves the count.
    pub fn upsert(&self, entry: IndexEntry) {
        let mut inner = self.inner.write();
        let new_kind = entry.kind;
        match inner.entries.insert(entry.path.clone(), entry) {
            None => adjust_count(&mut inner, new_kind, 1),
            Some(previous) if previous.kind != new_kind => {
                adjust_count(&mut inner, previous.kind, -1);
                adjust_count(&mut inner, new_kind, 1);
            }
            Some(_) => {}
        }
    }

    /// Marks `root` as fully crawled at depth 0 and stamps the crawl time.
    pub fn record_crawled_root(&self, root: &str, finished_at: u64) {
        let mut inner = self.inner.write();
        if !inner.crawled_roots.iter().any(|recorded| recorded == root) {
            inner.crawled_roots.push(root.to_string());
        }
        inner.last_index_time = Some(finished_at);
    }

    /// Counts a non-fatal listing failure.
    pub fn record_error(&self) {
        self.inner.write().errors += 1;
    }

    /// Empties the index and resets every counter.
    pub fn clear(&self) {
        *self.inner.write() = StoreInner::default();
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.read().entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<IndexEntry> {
        self.inner.read().entries.get(path).cloned()
    }

    pub fn crawled_roots(&self) -> Vec<String> {
        self.inner.read().crawled_roots.clone()
    }

    pub fn set_indexing(&self, value: bool) {
        self.is_indexing.store(value, Ordering::SeqCst);
    }

    pub fn is_indexing(&self) -> bool {
        self.is_indexing.load(Ordering::SeqCst)
    }

    /// Snapshot of the aggregate counters.
    pub fn stats(&self) -> IndexStats {
        let inner = self.inner.read();
        IndexStats {
            total_files: inner.total_files,
            total_directories: inner.total_directories,
            crawled_roots: inner.crawled_roots.clone(),
            last_index_time: inner.last_index_time,
            errors: inner.errors,
            is_indexing: self.is_indexing(),
        }
    }

    /// Read access for query scans. Held only for the duration of one scan.
    pub(crate) fn read_entries(
        &self,
    ) -> MappedRwLockReadGuard<'_, FnvHashMap<String, IndexEntry>> {
        RwLockReadGuard::map(self.inner.read(), |inner| &inner.entries)
    }
}

fn adjust_count(inner: &mut StoreInner, kind: EntryKind, delta: isize) {
    let counter = match kind {
        EntryKind::File | EntryKind::Symlink => &mut inner.total_files,
        EntryKind::Directory => &mut inner.total_directories,
    };
    *counter = counter.saturating_add_signed(delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, kind: EntryKind) -> IndexEntry {
        let name = path.rsplit('/').next().unwrap_or(path);
        IndexEntry::new(path, name, kind, 0, 0, "/")
    }

    #[test]
    fn upsert_counts_files_and_directories() {
        let store = IndexStore::new();
        store.upsert(entry("/a.txt", EntryKind::File));
        store.upsert(entry("/b", EntryKind::Directory));
        store.upsert(entry("/c", EntryKind::Symlink));

        let stats = store.stats();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_directories, 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn overwriting_the_same_path_does_not_double_count() {
        let store = IndexStore::new();
        store.upsert(entry("/a.txt", EntryKind::File));
        store.upsert(entry("/a.txt", EntryKind::File));

        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().total_files, 1);
    }

    #[test]
    fn kind_change_moves_the_count() {
        let store = IndexStore::new();
        store.upsert(entry("/x", EntryKind::File));
        store.upsert(entry("/x", EntryKind::Directory));

        let stats = store.stats();
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_directories, 1);
    }

    #[test]
    fn clear_resets_everything() {
        let store = IndexStore::new();
        store.upsert(entry("/a.txt", EntryKind::File));
        store.record_crawled_root("/", 123);
        store.record_error();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats(), IndexStats::default());
    }

    #[test]
    fn crawled_roots_are_deduplicated() {
        let store = IndexStore::new();
        store.record_crawled_root("/", 1);
        store.record_crawled_root("/home", 2);
        store.record_crawled_root("/", 3);

        let stats = store.stats();
        assert_eq!(stats.crawled_roots, vec!["/", "/home"]);
        assert_eq!(stats.last_index_time, Some(3));
    }

    #[test]
    fn indexing_flag_round_trips() {
        let store = IndexStore::new();
        assert!(!store.is_indexing());
        store.set_indexing(true);
        assert!(store.stats().is_indexing);
        store.set_indexing(false);
        assert!(!store.is_indexing());
    }
}
