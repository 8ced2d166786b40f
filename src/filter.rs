// src/filter.rs

/// Inclusion predicate over entry titles. An empty keyword list disables
/// filtering; otherwise the title passes when any keyword occurs in it,
/// case-insensitively.
pub fn title_matches(title: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let t = title.to_lowercase();
    keywords.iter().any(|k| t.contains(&k.to_lowercase()))
}
