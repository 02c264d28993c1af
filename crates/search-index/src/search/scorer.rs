//! Layered relevance scoring: exact, prefix, substring, then
//! edit-distance fuzzy.

use crate::search::highlight::find_case_insensitive;
use crate::types::{IndexEntry, MatchKind};

/// Window within which a recent modification earns a small bonus.
const RECENCY_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Per-segment depth penalty, capped so deep trees stay findable.
const DEPTH_PENALTY_PER_SEGMENT: f64 = 0.5;
const DEPTH_PENALTY_CAP: f64 = 10.0;

/// Lower-cases and strips non-alphanumeric code points.
/// Entry names and queries are normalized identically before matching.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

pub(crate) struct ScoreParams<'a> {
    pub raw_query: &'a str,
    pub norm_query: &'a str,
    pub fuzzy_threshold: f64,
    pub enable_typo_tolerance: bool,
    pub now_secs: u64,
}

/// Scores one entry against the query; `None` excludes it from results.
///
/// The tiers run in a fixed order: normalized equality (100), raw
/// case-sensitive equality (95), normalized prefix (80), normalized
/// substring (60), and only with typo tolerance on, edit-distance
/// similarity scaled to 50. Normalization already strips case, so a name
/// differing from the query only by case takes the 100 tier and the 95
/// tier cannot fire for it; the tier order is kept anyway.
pub(crate) fn score_entry(entry: &IndexEntry, params: &ScoreParams) -> Option<(f64, MatchKind)> {
    let (base, match_kind) = if entry.normalized_name == params.norm_query {
        (100.0, MatchKind::Exact)
    } else if entry.name == params.raw_query {
        (95.0, MatchKind::Exact)
    } else if entry.normalized_name.starts_with(params.norm_query) {
        (80.0, MatchKind::Prefix)
    } else if entry.normalized_name.contains(params.norm_query) {
        (60.0, MatchKind::Content)
    } else if params.enable_typo_tolerance {
        let similarity = similarity(params.norm_query, &entry.normalized_name);
        if similarity < params.fuzzy_threshold {
            return None;
        }
        (similarity * 50.0, MatchKind::Fuzzy)
    } else {
        return None;
    };

    let mut score = base;
    if find_case_insensitive(&entry.name, params.raw_query).is_some() {
        score += 10.0;
    }
    if params.now_secs.saturating_sub(entry.modified_at) < RECENCY_WINDOW_SECS {
        score += 5.0;
    }
    score -= (path_depth(&entry.path) as f64 * DEPTH_PENALTY_PER_SEGMENT).min(DEPTH_PENALTY_CAP);

    if score <= 0.0 {
        return None;
    }
    Some((score, match_kind))
}

/// Normalized similarity in `[0, 1]`: 1 minus the edit distance over the
/// longer length.
fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Classic dynamic-programming edit distance over code points, with unit
/// substitution, insertion, and deletion costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Number of non-empty segments under either separator style.
fn path_depth(path: &str) -> usize {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .count()
}
