//! Registry of paths excluded from indexing.
//!
//! Two layers of exclusion: an explicit, mutable set of registered paths
//! (a path is protected if it equals one or lives under one), and a fixed
//! list of structural patterns that catch OS-reserved directories wherever
//! they appear.

use parking_lot::RwLock;

/// Seed exclusions: pseudo-filesystems the warm-up crawl of `/` must
/// never descend into.
const DEFAULT_PROTECTED: &[&str] = &["/proc", "/sys", "/dev", "/run"];

/// Shared exclusion list, consulted by the crawler before indexing an
/// entry and before recursing into a directory.
#[derive(Debug)]
pub struct ProtectedPathRegistry {
    paths: RwLock<Vec<String>>,
}

impl Default for ProtectedPathRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtectedPathRegistry {
    /// Creates a registry seeded with the default OS exclusions.
    pub fn new() -> Self {
        Self {
            paths: RwLock::new(DEFAULT_PROTECTED.iter().map(|p| p.to_string()).collect()),
        }
    }

    /// Creates a registry with no registered paths. Structural patterns
    /// still apply.
    pub fn empty() -> Self {
        Self {
            paths: RwLock::new(Vec::new()),
        }
    }

    /// True if `path` is a registered path, a descendant of one, or
    /// matches a structural pattern.
    pub fn is_protected(&self, path: &str) -> bool {
        if matches_structural_pattern(path) {
            return true;
        }
        self.paths
            .read()
            .iter()
            .any(|registered| path == registered || is_descendant_of(path, registered))
    }

    pub fn add(&self, path: impl Into<String>) {
        let path = path.into();
        let mut paths = self.paths.write();
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    pub fn remove(&self, path: &str) {
        self.paths.write().retain(|registered| registered != path);
    }

    /// Registered paths in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.paths.read().clone()
    }

    pub fn clear(&self) {
        self.paths.write().clear();
    }
}

/// Descendant check under either `/`- or `\`-style separators.
fn is_descendant_of(path: &str, ancestor: &str) -> bool {
    let base = ancestor.trim_end_matches(['/', '\\']);
    if path.len() <= base.len() || !path.starts_with(base) {
        return false;
    }
    matches!(path.as_bytes()[base.len()], b'/' | b'\\')
}

/// Fixed patterns for OS-reserved directories: a segment beginning with
/// `$`, a dot-segment whose second character is an uppercase ASCII
/// letter, or any path mentioning `System Volume`.
fn matches_structural_pattern(path: &str) -> bool {
    if path.contains("System Volume") {
        return true;
    }
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .any(segment_is_reserved)
}

fn segment_is_reserved(segment: &str) -> bool {
    if segment.starts_with('$') {
        return true;
    }
    let mut chars = segment.chars();
    chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}
