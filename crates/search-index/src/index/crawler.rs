//! Depth-bounded background crawler.
//!
//! One crawl walks one root: listings are fetched from the collaborator,
//! every child of a directory is upserted before any recursion below it,
//! and protected paths are skipped without recursing. Listing failures
//! never abort a crawl; permission problems stay silent, everything else
//! is logged and counted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::index::store::IndexStore;
use crate::listing::{DirectoryLister, DirectoryListing};
use crate::protected::ProtectedPathRegistry;
use crate::types::{unix_now_secs, EntryKind, IndexEntry};

/// Depth of the warm-up crawl spawned at engine start.
pub const INITIAL_CRAWL_DEPTH: usize = 2;

/// Depth used when `refresh_index` re-crawls recorded roots.
pub const REFRESH_CRAWL_DEPTH: usize = 3;

pub(crate) struct Crawler {
    store: Arc<IndexStore>,
    protected: Arc<ProtectedPathRegistry>,
    lister: Arc<dyn DirectoryLister>,
}

/// Resets the indexing flag however the depth-0 frame exits.
struct IndexingGuard<'a> {
    store: &'a IndexStore,
}

impl Drop for IndexingGuard<'_> {
    fn drop(&mut self) {
        self.store.set_indexing(false);
    }
}

impl Crawler {
    pub fn new(
        store: Arc<IndexStore>,
        protected: Arc<ProtectedPathRegistry>,
        lister: Arc<dyn DirectoryLister>,
    ) -> Self {
        Self {
            store,
            protected,
            lister,
        }
    }

    /// Crawls `root` down to `max_depth`.
    ///
    /// The indexing flag is toggled only by this top-level frame; deeper
    /// recursion does not touch it, so observers see one indexing cycle
    /// per root crawl. The root lands in the crawled-roots list only after
    /// its depth-0 listing succeeded and the crawl was not cancelled.
    pub async fn index_path(
        &self,
        root: &str,
        max_depth: usize,
        include_hidden: bool,
        token: &CancellationToken,
    ) {
        if max_depth == 0 {
            return;
        }
        if self.protected.is_protected(root) {
            log::debug!("crawl skipped protected root path={root}");
            return;
        }

        self.store.set_indexing(true);
        let _guard = IndexingGuard {
            store: self.store.as_ref(),
        };

        let listed = self
            .crawl_directory(root, max_depth, 0, include_hidden, token)
            .await;
        if listed && !token.is_cancelled() {
            self.store.record_crawled_root(root, unix_now_secs());
            log::info!(
                "crawl finished root={root} max_depth={max_depth} indexed={}",
                self.store.len()
            );
        }
    }

    /// Recursive step. Returns whether this frame's listing succeeded.
    fn crawl_directory<'a>(
        &'a self,
        path: &'a str,
        max_depth: usize,
        depth: usize,
        include_hidden: bool,
        token: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            if depth >= max_depth || token.is_cancelled() {
                return false;
            }

            let listing = match self.lister.list_directory(path, include_hidden).await {
                Ok(listing) => listing,
                Err(error) if error.is_permission_denied() => {
                    log::debug!("crawl skipped unreadable directory path={path}");
                    return false;
                }
                Err(error) => {
                    log::warn!("crawl listing failed path={path} error={error}");
                    self.store.record_error();
                    return false;
                }
            };

            if depth == 0 {
                self.store.upsert(root_entry(&listing));
            }

            // Whole levels land in the index before any recursion below
            // them, so a query issued mid-crawl never sees a child without
            // its siblings.
            let mut subdirectories = Vec::new();
            for child in &listing.entries {
                if self.protected.is_protected(&child.path) {
                    log::debug!("crawl skipped protected path={}", child.path);
                    continue;
                }
                self.store.upsert(IndexEntry::new(
                    child.path.clone(),
                    child.name.clone(),
                    child.kind,
                    child.size,
                    child.modified_at,
                    path,
                ));
                if child.kind == EntryKind::Directory {
                    subdirectories.push(child.path.clone());
                }
            }

            for subdirectory in subdirectories {
                if token.is_cancelled() {
                    break;
                }
                self.crawl_directory(&subdirectory, max_depth, depth + 1, include_hidden, token)
                    .await;
            }

            true
        })
    }
}

/// Entry for the crawled root itself, synthesized from its listing.
fn root_entry(listing: &DirectoryListing) -> IndexEntry {
    let path = listing.path.as_str();
    IndexEntry::new(
        path,
        leaf_name(path),
        EntryKind::Directory,
        listing.total_size,
        0,
        parent_of(path),
    )
}

/// Last non-empty path segment, or the path itself for bare roots.
fn leaf_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

fn parent_of(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(0) => "/".to_string(),
        Some(position) => trimmed[..position].to_string(),
        None => String::new(),
    }
}
