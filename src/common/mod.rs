use once_cell::sync::Lazy;
use regex::Regex;

static URL_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://|www\.)").expect("valid url regex"));

/// Case-insensitive `str::strip_prefix`. Comparison is per character using
/// Unicode lowercase folding, so the returned remainder always starts on a
/// character boundary of `s`.
pub fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s.char_indices();
    for p in prefix.chars() {
        let (_, c) = rest.next()?;
        if c != p && !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    let offset = rest.next().map(|(i, _)| i).unwrap_or(s.len());
    Some(&s[offset..])
}

/// Key used for case-insensitive de-duplication.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// True for strings that are already navigable addresses rather than
/// search phrases.
pub fn looks_like_url(s: &str) -> bool {
    URL_LIKE.is_match(s.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_ci_handles_case_and_unicode() {
        assert_eq!(strip_prefix_ci("Rust Lang", "rust"), Some(" Lang"));
        assert_eq!(strip_prefix_ci("Äpfel", "äp"), Some("fel"));
        assert_eq!(strip_prefix_ci("abc", ""), Some("abc"));
        assert_eq!(strip_prefix_ci("abc", "abc"), Some(""));
        assert_eq!(strip_prefix_ci("ab", "abc"), None);
        assert_eq!(strip_prefix_ci("xbc", "a"), None);
    }

    #[test]
    fn url_detection() {
        assert!(looks_like_url("https://example.com"));
        assert!(looks_like_url("HTTP://EXAMPLE.COM"));
        assert!(looks_like_url("www.example.com"));
        assert!(!looks_like_url("httpie download"));
        assert!(!looks_like_url("rust book"));
    }
}
