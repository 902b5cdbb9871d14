//! The selector catalog: ordered extraction rules for article markup.
//!
//! Search result pages come from arbitrary sites with no stable markup, so
//! every field is looked up through a fixed, ordered list of CSS rules. For
//! each field the first rule that produces an acceptable value wins and
//! later rules are never consulted. The order below is part of the
//! behaviour: identical markup always yields identical records.
//!
//! | Field | Acceptance check |
//! |-------|------------------|
//! | container | any match (capped per rule by the caller) |
//! | title | at least [`MIN_TITLE_CHARS`] characters |
//! | link | resolves to an `http(s)` URL |
//! | summary | non-empty; cut to the configured length |
//!
//! A candidate without a title or a link is not an article and yields `None`.

use crate::models::RawArticle;
use crate::utils::{collapse_whitespace, normalize_url, truncate_chars};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// Titles shorter than this are navigation labels, not headlines.
pub const MIN_TITLE_CHARS: usize = 10;

/// Container rules, most specific first.
const CONTAINER_RULES: &[&str] = &[
    "article",
    r#"div[role="article"]"#,
    "div.article-item",
    "div.news-item",
    "div.post",
    "div.story",
    "div.item",
    r#"a[data-trackable="link"]"#,
    "div.result",
    "div.g",
    "section.article",
    r#"div[class*="article"]"#,
    r#"div[class*="news"]"#,
    "li[data-article]",
];

const TITLE_RULES: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "a[aria-label]",
    r#"span[class*="headline"]"#,
    ".title",
    ".headline",
    ".heading",
    r#"[class*="title"]"#,
    r#"[class*="headline"]"#,
];

const SUMMARY_RULES: &[&str] = &[
    ".summary",
    ".excerpt",
    ".description",
    r#"[class*="summary"]"#,
    r#"[class*="excerpt"]"#,
    r#"[class*="description"]"#,
    "p",
];

/// One named CSS rule.
#[derive(Debug)]
pub struct Rule {
    pub pattern: &'static str,
    pub selector: Selector,
}

impl Rule {
    fn parse(pattern: &'static str) -> Self {
        Rule {
            pattern,
            selector: Selector::parse(pattern).unwrap(),
        }
    }

    /// Normalized text of the first descendant of `element` matching this rule.
    pub fn first_text(&self, element: ElementRef<'_>) -> Option<String> {
        element.select(&self.selector).next().map(element_text)
    }
}

/// Compiled rule lists, built once.
#[derive(Debug)]
pub struct SelectorCatalog {
    pub containers: Vec<Rule>,
    pub titles: Vec<Rule>,
    pub summaries: Vec<Rule>,
    link: Selector,
}

pub static CATALOG: Lazy<SelectorCatalog> = Lazy::new(|| SelectorCatalog {
    containers: CONTAINER_RULES.iter().copied().map(Rule::parse).collect(),
    titles: TITLE_RULES.iter().copied().map(Rule::parse).collect(),
    summaries: SUMMARY_RULES.iter().copied().map(Rule::parse).collect(),
    link: Selector::parse("a[href]").unwrap(),
});

/// Labels attached to every record extracted from one page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Relative links are resolved against this URL.
    pub base_url: &'a str,
    pub language: &'a str,
    pub website: &'a str,
    pub keyword: &'a str,
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

impl SelectorCatalog {
    /// First title rule whose text is long enough.
    pub fn title(&self, element: ElementRef<'_>) -> Option<String> {
        self.titles
            .iter()
            .filter_map(|rule| rule.first_text(element))
            .find(|text| text.chars().count() >= MIN_TITLE_CHARS)
    }

    /// First link inside the container, or the container itself when it is an anchor.
    pub fn link(&self, element: ElementRef<'_>, base_url: &str) -> Option<String> {
        let descendant = || {
            element
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr("href"))
        };
        let own = || {
            (element.value().name() == "a")
                .then(|| element.value().attr("href"))
                .flatten()
        };
        descendant()
            .or_else(own)
            .and_then(|href| normalize_url(base_url, href))
    }

    /// First non-empty summary rule, cut to `max_chars`.
    pub fn summary(&self, element: ElementRef<'_>, max_chars: usize) -> Option<String> {
        self.summaries
            .iter()
            .filter_map(|rule| rule.first_text(element))
            .find(|text| !text.is_empty())
            .map(|text| truncate_chars(&text, max_chars).trim_end().to_string())
    }

    /// Build a record from one container, or `None` when it lacks a title or link.
    pub fn extract(
        &self,
        element: ElementRef<'_>,
        ctx: &PageContext<'_>,
        summary_chars: usize,
    ) -> Option<RawArticle> {
        let title = self.title(element)?;
        let url = self.link(element, ctx.base_url)?;
        let summary = self.summary(element, summary_chars).unwrap_or_default();

        Some(RawArticle {
            title,
            url,
            summary,
            language: ctx.language.to_string(),
            website: ctx.website.to_string(),
            keyword: ctx.keyword.to_string(),
        })
    }
}
