//! Search URL construction.
//!
//! Known sites are recognized by a substring of their host, checked in
//! table order; the first match decides the query pattern. Anything else
//! gets the common `/search?q=` pattern.

use crate::models::WebsiteConfig;
use urlencoding::encode;

/// Where a search query is sent, relative to the site's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    /// Appended to the base URL; the encoded keyword follows.
    Relative(&'static str),
    /// A fixed absolute URL prefix; the encoded keyword follows.
    Absolute(&'static str),
}

const DEFAULT_PATTERN: Pattern = Pattern::Relative("/search?q=");

/// (host substrings, pattern), first match wins.
const KNOWN_SITES: &[(&[&str], Pattern)] = &[
    (&["google.com", "news.google"], Pattern::Absolute("https://www.google.com/search?q=")),
    (&["bbc.com"], Pattern::Relative("/search?q=")),
    (&["cnn.com"], Pattern::Relative("/cnn/search?query=")),
    (&["reuters.com"], Pattern::Relative("/search?query=")),
    (&["bbc.co.in", "bbc"], Pattern::Relative("/search?q=")),
    (&["thehindu.com", "hindu"], Pattern::Relative("/news/national?q=")),
    (&["indiatoday.in", "indiatoday"], Pattern::Relative("/search?q=")),
    (&["deccan", "herald"], Pattern::Relative("/search?q=")),
    (&["aaj-tak", "aajtaak"], Pattern::Relative("/search?q=")),
];

fn pattern_for(host: &str) -> Pattern {
    KNOWN_SITES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| host.contains(n)))
        .map(|(_, pattern)| *pattern)
        .unwrap_or(DEFAULT_PATTERN)
}

/// Build the search URL for `keyword` on `website`.
pub fn build_search_url(website: &WebsiteConfig, keyword: &str) -> String {
    let base = website.url.trim().trim_end_matches('/');
    let query = encode(keyword.trim());
    match pattern_for(&website.host()) {
        Pattern::Relative(path) => format!("{base}{path}{query}"),
        Pattern::Absolute(prefix) => format!("{prefix}{query}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str) -> WebsiteConfig {
        WebsiteConfig {
            name: "Site".to_string(),
            url: url.to_string(),
            language: "English".to_string(),
        }
    }

    #[test]
    fn test_known_domains() {
        assert_eq!(
            build_search_url(&site("https://www.cnn.com/"), "election"),
            "https://www.cnn.com/cnn/search?query=election"
        );
        assert_eq!(
            build_search_url(&site("https://www.reuters.com"), "rate cut"),
            "https://www.reuters.com/search?query=rate%20cut"
        );
        assert_eq!(
            build_search_url(&site("https://www.thehindu.com"), "budget"),
            "https://www.thehindu.com/news/national?q=budget"
        );
        assert_eq!(
            build_search_url(&site("https://news.google.com/topstories"), "budget"),
            "https://www.google.com/search?q=budget"
        );
    }

    #[test]
    fn test_fallback_pattern() {
        assert_eq!(
            build_search_url(&site("https://www.ndtv.com"), "चुनाव"),
            "https://www.ndtv.com/search?q=%E0%A4%9A%E0%A5%81%E0%A4%A8%E0%A4%BE%E0%A4%B5"
        );
    }

    #[test]
    fn test_first_matching_entry_wins() {
        // "hindustantimes" contains "hindu", so it takes the national-news pattern.
        assert_eq!(pattern_for("www.hindustantimes.com"), Pattern::Relative("/news/national?q="));
        // "bbc.com" is checked before the looser "bbc" entry.
        assert_eq!(pattern_for("www.bbc.com"), Pattern::Relative("/search?q="));
        assert_eq!(pattern_for("example.org"), DEFAULT_PATTERN);
    }

    #[test]
    fn test_base_path_is_kept() {
        assert_eq!(
            build_search_url(&site("https://www.bbc.com/news/"), "budget"),
            "https://www.bbc.com/news/search?q=budget"
        );
    }
}
