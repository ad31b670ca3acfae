use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;

/// Collapses every whitespace run into a single space and trims both ends.
pub fn remove_excess_whitespace(s: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    // a lone space is left alone so clean text stays borrowed
    let re = RE.get_or_init(|| Regex::new(r"\s\s+|[^\S ]").expect("regex should be valid"));
    re.replace_all(s.trim(), " ")
}

/// Cuts `s` down to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        assert_eq!(remove_excess_whitespace("  Linsen\n\t suppe  "), "Linsen suppe");
        assert_eq!(remove_excess_whitespace("a\tb"), "a b");
        assert_eq!(remove_excess_whitespace("a\u{a0}b"), "a b");
        assert!(matches!(remove_excess_whitespace("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Käsespätzle", 4), "Käse");
        assert_eq!(truncate_chars("kurz", 250), "kurz");
    }
}
