//! Marks the first matched substring in a display name.

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Wraps the first case-insensitive occurrence of `query` in `name` with
/// highlight markers, preserving the original casing. A name with no
/// literal occurrence (a pure fuzzy match) comes back unchanged, and
/// only the first occurrence is ever marked.
pub fn highlight(name: &str, query: &str) -> String {
    match find_case_insensitive(name, query) {
        Some((start, end)) => format!(
            "{}{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}{}",
            &name[..start],
            &name[start..end],
            &name[end..]
        ),
        None => name.to_string(),
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in
/// `haystack`, comparing code point by code point.
pub(crate) fn find_case_insensitive(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let needle: Vec<char> = needle.chars().collect();
    let hay: Vec<(usize, char)> = haystack.char_indices().collect();
    if needle.len() > hay.len() {
        return None;
    }

    for start in 0..=hay.len() - needle.len() {
        let window = &hay[start..start + needle.len()];
        if window
            .iter()
            .zip(&needle)
            .all(|((_, h), n)| chars_eq_ignore_case(*h, *n))
        {
            let begin = window[0].0;
            let end = hay
                .get(start + needle.len())
                .map(|(offset, _)| *offset)
                .unwrap_or(haystack.len());
            return Some((begin, end));
        }
    }
    None
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
