//! Process-wide search configuration with get/patch semantics.

use serde::{Deserialize, Serialize};

use crate::types::KindSet;

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

/// Live configuration consulted by every search and crawl.
///
/// Values are stored exactly as given: a `fuzzy_threshold` outside
/// `[0, 1]` or a zero `max_results` is kept, not clamped or
/// reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result-list cap applied after sorting.
    pub max_results: usize,
    /// Minimum normalized similarity for a fuzzy match to be accepted.
    pub fuzzy_threshold: f64,
    /// Whether the edit-distance fuzzy tier runs at all.
    pub enable_typo_tolerance: bool,
    /// Whether crawls request hidden entries from the lister.
    /// Consulted only when crawling, not when scoring.
    pub search_hidden: bool,
    /// Entry kinds admitted into results.
    pub allowed_kinds: KindSet,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            enable_typo_tolerance: true,
            search_hidden: false,
            allowed_kinds: KindSet::all(),
        }
    }
}

/// Partial update: unset fields leave the current value untouched.
///
/// Used both for `update_config` (mutates the process config) and as a
/// per-search override (merged without mutating).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfigPatch {
    pub max_results: Option<usize>,
    pub fuzzy_threshold: Option<f64>,
    pub enable_typo_tolerance: Option<bool>,
    pub search_hidden: Option<bool>,
    pub allowed_kinds: Option<KindSet>,
}

impl SearchConfig {
    /// Applies the patch's set fields in place.
    pub fn apply(&mut self, patch: &SearchConfigPatch) {
        if let Some(max_results) = patch.max_results {
            self.max_results = max_results;
        }
        if let Some(fuzzy_threshold) = patch.fuzzy_threshold {
            self.fuzzy_threshold = fuzzy_threshold;
        }
        if let Some(enable_typo_tolerance) = patch.enable_typo_tolerance {
            self.enable_typo_tolerance = enable_typo_tolerance;
        }
        if let Some(search_hidden) = patch.search_hidden {
            self.search_hidden = search_hidden;
        }
        if let Some(allowed_kinds) = patch.allowed_kinds {
            self.allowed_kinds = allowed_kinds;
        }
    }

    /// Returns a copy with the patch applied, leaving `self` untouched.
    pub fn merged(&self, patch: &SearchConfigPatch) -> Self {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }
}
