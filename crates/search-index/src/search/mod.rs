//! Query execution over the index store.

mod highlight;
mod scorer;

pub use highlight::{highlight, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
pub use scorer::{levenshtein, normalize};

use crate::config::SearchConfig;
use crate::index::IndexStore;
use crate::types::{unix_now_secs, SearchResultItem};

use scorer::{score_entry, ScoreParams};

/// Runs one query against the current index snapshot.
///
/// A pure synchronous scan with no I/O and no caching; results are
/// recomputed on every call. The store's read lock is held for the
/// duration of the scan, so crawler writes land between queries, never
/// inside one.
/// Ties in the descending sort keep scan order; with a hash-keyed store
/// that order is arbitrary but never torn.
pub(crate) fn execute(
    store: &IndexStore,
    config: &SearchConfig,
    raw_query: &str,
) -> Vec<SearchResultItem> {
    let query = raw_query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let norm_query = normalize(query);
    let params = ScoreParams {
        raw_query: query,
        norm_query: &norm_query,
        fuzzy_threshold: config.fuzzy_threshold,
        enable_typo_tolerance: config.enable_typo_tolerance,
        now_secs: unix_now_secs(),
    };

    let mut results = Vec::new();
    {
        let entries = store.read_entries();
        for entry in entries.values() {
            if !config.allowed_kinds.allows(entry.kind) {
                continue;
            }
            if let Some((score, match_kind)) = score_entry(entry, &params) {
                results.push(SearchResultItem {
                    highlighted_name: highlight(&entry.name, query),
                    entry: entry.clone(),
                    score,
                    match_kind,
                });
            }
        }
    }

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(config.max_results);
    results
}
