//! Data models shared by every pipeline stage.
//!
//! - [`WebsiteConfig`] / [`KeywordConfig`]: externally supplied, read-only inputs
//! - [`RawArticle`]: one extracted search result, produced by discovery
//! - [`RunReport`]: the terminal outcome of a successful run
//!
//! Language tags are compared verbatim (`"English"` and `"english"` are
//! different tags), matching how the configuration sheet is maintained.

use serde::{Deserialize, Serialize};
use url::Url;

/// A website to search, as listed in the website configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebsiteConfig {
    /// Human readable site name, used as the article's source label.
    pub name: String,
    /// Base URL the search URL is built from and relative links are resolved against.
    pub url: String,
    /// Language tag; only keywords with the same tag are searched on this site.
    pub language: String,
}

impl WebsiteConfig {
    /// Lowercased host of the base URL, or the lowercased raw URL when it does not parse.
    pub fn host(&self) -> String {
        Url::parse(self.url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_else(|| self.url.trim().to_lowercase())
    }
}

/// A keyword to search for, as listed in the keyword configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordConfig {
    pub keyword: String,
    pub language: String,
}

/// A candidate article extracted from a search results page or feed.
///
/// Created once per successful extraction and never mutated afterwards.
/// `url` is already normalized (scheme, host and path; query and fragment
/// stripped), so it can be used directly as an identity key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    /// Short description, empty when the markup had none.
    pub summary: String,
    pub language: String,
    /// Name of the [`WebsiteConfig`] the article was found on.
    pub website: String,
    /// The keyword whose search produced this article.
    pub keyword: String,
}

/// Summary of a completed run, returned by the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// URL of the composed document, or of the placeholder when export was unavailable.
    pub document_url: String,
    /// `Some(reason)` when the export backend could not be used and a placeholder was returned.
    pub placeholder_reason: Option<String>,
    pub keywords: usize,
    pub websites: usize,
    pub discovered: usize,
    pub unique: usize,
    pub elapsed_ms: u128,
}

impl RunReport {
    pub fn is_placeholder(&self) -> bool {
        self.placeholder_reason.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_host_is_lowercased() {
        let site = WebsiteConfig {
            name: "BBC News".to_string(),
            url: "https://WWW.BBC.com/news".to_string(),
            language: "English".to_string(),
        };
        assert_eq!(site.host(), "www.bbc.com");
    }

    #[test]
    fn test_website_host_falls_back_to_raw_url() {
        let site = WebsiteConfig {
            name: "Broken".to_string(),
            url: "Not A Url".to_string(),
            language: "English".to_string(),
        };
        assert_eq!(site.host(), "not a url");
    }

    #[test]
    fn test_raw_article_serialization() {
        let article = RawArticle {
            title: "PM announces budget".to_string(),
            url: "https://x.com/a".to_string(),
            summary: String::new(),
            language: "English".to_string(),
            website: "X".to_string(),
            keyword: "budget".to_string(),
        };

        let json = serde_json::to_string(&article).unwrap();
        let back: RawArticle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_run_report_placeholder_flag() {
        let mut report = RunReport {
            document_url: "https://docs.google.com/document/d/abc/edit".to_string(),
            placeholder_reason: None,
            keywords: 2,
            websites: 1,
            discovered: 10,
            unique: 7,
            elapsed_ms: 1200,
        };
        assert!(!report.is_placeholder());
        report.placeholder_reason = Some("no access token".to_string());
        assert!(report.is_placeholder());
    }
}
