//! Fuzzy course-title resolution

/// Resolve a user-supplied course fragment against catalog titles.
///
/// Two case-insensitive passes:
/// 1. first title containing the whole fragment;
/// 2. first title containing any whitespace-delimited fragment word
///    longer than two characters.
///
/// On both passes the first match in catalog order wins; there is no
/// ranking between candidates. Blank fragments resolve to nothing.
pub fn resolve_course_title<'a>(fragment: &str, titles: &[&'a str]) -> Option<&'a str> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for &title in titles {
        if title.to_lowercase().contains(&needle) {
            return Some(title);
        }
    }

    let words: Vec<&str> = needle
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect();
    if words.is_empty() {
        return None;
    }

    for &title in titles {
        let lower = title.to_lowercase();
        if words.iter().any(|word| lower.contains(word)) {
            return Some(title);
        }
    }

    None
}
