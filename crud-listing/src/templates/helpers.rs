//! Text helpers used when building view data for templates.

use std::fmt::Display;

/// Truncate text with ellipsis.
///
/// Counts characters, not bytes, so multi-byte names are never cut
/// mid-character.
///
/// # Example
///
/// ```rust
/// use crud_listing::templates::truncate;
///
/// assert_eq!(truncate("Hello, World!", 5), "He...");
/// assert_eq!(truncate("Hi", 10), "Hi");
/// ```
#[must_use]
pub fn truncate(s: impl Display, max_len: usize) -> String {
    let s = s.to_string();
    if s.chars().count() <= max_len {
        s
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Pluralize a word based on count.
///
/// # Example
///
/// ```rust
/// use crud_listing::templates::pluralize;
///
/// assert_eq!(pluralize(1, "thing", "things"), "thing");
/// assert_eq!(pluralize(2, "thing", "things"), "things");
/// assert_eq!(pluralize(0, "thing", "things"), "things");
/// ```
#[must_use]
pub fn pluralize(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        plural.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello, World!", 5), "He...");
        assert_eq!(truncate("Hi", 10), "Hi");
        assert_eq!(truncate("", 5), "");
        assert_eq!(truncate("Test", 4), "Test");
        assert_eq!(truncate("Test", 3), "...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Zürich Überweg", 6), "Zür...");
        assert_eq!(truncate("日本語のテキスト", 5), "日本...");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "item", "items"), "items");
        assert_eq!(pluralize(1, "item", "items"), "item");
        assert_eq!(pluralize(2, "item", "items"), "items");
    }
}
