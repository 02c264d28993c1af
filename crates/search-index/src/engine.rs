//! Engine facade: owns the shared context and wires the crawler to the
//! query side.
//!
//! One engine per process, shared behind `Arc`. The index store is the
//! only mutable state crawls and queries share; the crawler writes it,
//! searches and stats observers read it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cancel::CrawlGenerations;
use crate::config::{SearchConfig, SearchConfigPatch};
use crate::index::{Crawler, IndexStore, INITIAL_CRAWL_DEPTH, REFRESH_CRAWL_DEPTH};
use crate::listing::DirectoryLister;
use crate::protected::ProtectedPathRegistry;
use crate::search;
use crate::types::{IndexStats, SearchResultItem};

pub struct SearchEngine {
    store: Arc<IndexStore>,
    protected: Arc<ProtectedPathRegistry>,
    config: RwLock<SearchConfig>,
    crawler: Crawler,
    crawls: CrawlGenerations,
}

impl SearchEngine {
    /// Creates an engine with default config and a cold index.
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Arc<Self> {
        let store = Arc::new(IndexStore::new());
        let protected = Arc::new(ProtectedPathRegistry::new());
        let crawler = Crawler::new(store.clone(), protected.clone(), lister.clone());
        Arc::new(Self {
            store,
            protected,
            config: RwLock::new(SearchConfig::default()),
            crawler,
            crawls: CrawlGenerations::new(),
        })
    }

    /// Creates the engine and spawns a shallow warm-up crawl of every
    /// filesystem root, so the first search has results to work with.
    /// Must be called from within a tokio runtime.
    pub fn start(lister: Arc<dyn DirectoryLister>) -> Arc<Self> {
        let engine = Self::new(lister.clone());
        let warm = engine.clone();
        tokio::spawn(async move {
            for root in lister.roots().await {
                warm.index_path(&root, INITIAL_CRAWL_DEPTH).await;
            }
        });
        engine
    }

    /// Crawls `root` down to `max_depth`, returning when the crawl ends.
    pub async fn index_path(&self, root: &str, max_depth: usize) {
        let include_hidden = self.config.read().search_hidden;
        let token = self.crawls.token();
        self.crawler
            .index_path(root, max_depth, include_hidden, &token)
            .await;
    }

    /// Spawns `index_path` as a background task.
    pub fn spawn_index_path(
        self: &Arc<Self>,
        root: impl Into<String>,
        max_depth: usize,
    ) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        let root = root.into();
        tokio::spawn(async move { engine.index_path(&root, max_depth).await })
    }

    /// Clears the index and re-crawls every previously recorded root.
    pub async fn refresh_index(&self) {
        let roots = self.store.crawled_roots();
        self.store.clear();
        for root in roots {
            self.index_path(&root, REFRESH_CRAWL_DEPTH).await;
        }
    }

    /// Empties the index store and resets the stats.
    pub fn clear_index(&self) {
        self.store.clear();
    }

    /// Cancels every in-flight crawl. Crawls started afterwards run
    /// normally.
    pub fn cancel_crawls(&self) {
        self.crawls.cancel_all();
    }

    /// Ranked search over the current index snapshot. An override merges
    /// over the process config for this call only.
    pub fn search(
        &self,
        query: &str,
        overrides: Option<&SearchConfigPatch>,
    ) -> Vec<SearchResultItem> {
        let config = self.config.read().clone();
        let effective = match overrides {
            Some(patch) => config.merged(patch),
            None => config,
        };
        search::execute(&self.store, &effective, query)
    }

    /// Aggregate counters, including the indexing flag. Pollable; always
    /// reflects the latest completed writes.
    pub fn stats(&self) -> IndexStats {
        self.store.stats()
    }

    pub fn is_indexing(&self) -> bool {
        self.store.is_indexing()
    }

    /// Copy of the current process config.
    pub fn config(&self) -> SearchConfig {
        self.config.read().clone()
    }

    /// Shallow-merges the patch into the process config.
    pub fn update_config(&self, patch: &SearchConfigPatch) {
        self.config.write().apply(patch);
    }

    pub fn add_protected_path(&self, path: impl Into<String>) {
        self.protected.add(path);
    }

    pub fn remove_protected_path(&self, path: &str) {
        self.protected.remove(path);
    }

    pub fn list_protected_paths(&self) -> Vec<String> {
        self.protected.list()
    }

    pub fn clear_protected_paths(&self) {
        self.protected.clear();
    }
}
