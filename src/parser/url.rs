//! Bare URL recognition in plain text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme optional, host with a dot and a 2+ character TLD, optional path.
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:https?)://)?[-\w.]+\.[a-zA-Z]{2,}(?:/\S*)?$").unwrap()
});

/// Whether a whitespace-delimited word looks like a URL.
pub(crate) fn is_url(word: &str) -> bool {
    word.contains('.') && URL.is_match(word)
}

/// Whether the word already carries an explicit scheme.
pub(crate) fn has_scheme(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_hosts_and_paths() {
        assert!(is_url("example.com"));
        assert!(is_url("www.example.com/path?q=1"));
        assert!(is_url("https://example.com"));
        assert!(is_url("sub.domain.example.org"));
    }

    #[test]
    fn rejects_plain_words() {
        assert!(!is_url("hello"));
        assert!(!is_url("1.5"));
        assert!(!is_url("end."));
        assert!(!is_url("a b.com"));
    }

    #[test]
    fn scheme_detection() {
        assert!(has_scheme("https://example.com"));
        assert!(!has_scheme("example.com"));
    }
}
