//! Page-level extraction: walk the container rules over one parsed page.
//!
//! A node can match several container rules (an `<article class="news">` is
//! both `article` and `div[class*="news"]`-like markup), so nodes already
//! visited during this call are recognized by a short prefix of their
//! serialized HTML and skipped. That set lives only for the duration of
//! one [`extract_articles`] call.

use super::selectors::{CATALOG, PageContext};
use crate::models::RawArticle;
use crate::utils::{truncate_chars, truncate_for_log};
use scraper::Html;
use std::collections::HashSet;
use tracing::debug;

/// Serialized prefix length used to recognize an already visited node.
const FINGERPRINT_CHARS: usize = 100;

/// Caps applied while walking one page.
#[derive(Debug, Clone, Copy)]
pub struct ExtractLimits {
    /// Candidates considered per container rule.
    pub per_rule: usize,
    /// Records kept per page.
    pub per_page: usize,
    /// Summary length in characters.
    pub summary_chars: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            per_rule: 20,
            per_page: 30,
            summary_chars: 300,
        }
    }
}

/// Parse `html` once and extract up to `limits.per_page` records, in rule order.
pub fn extract_articles(
    html: &str,
    ctx: &PageContext<'_>,
    limits: &ExtractLimits,
) -> Vec<RawArticle> {
    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut articles: Vec<RawArticle> = Vec::new();

    'rules: for rule in &CATALOG.containers {
        for element in document.select(&rule.selector).take(limits.per_rule) {
            if !seen.insert(truncate_chars(&element.html(), FINGERPRINT_CHARS)) {
                continue;
            }
            let Some(article) = CATALOG.extract(element, ctx, limits.summary_chars) else {
                continue;
            };
            if articles.contains(&article) {
                continue;
            }
            debug!(
                rule = rule.pattern,
                title = %truncate_for_log(&article.title, 80),
                "Container matched"
            );
            articles.push(article);
            if articles.len() >= limits.per_page {
                break 'rules;
            }
        }
    }

    debug!(
        website = ctx.website,
        keyword = ctx.keyword,
        count = articles.len(),
        "Extracted articles from page"
    );
    articles
}
