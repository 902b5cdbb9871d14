//! News feed discovery mode.
//!
//! Instead of scraping a site's own search page, ask a Google-News-style
//! RSS search endpoint for recent items restricted to the site:
//!
//! ```text
//! {endpoint}?q="<keyword>" site:<host> when:2d&hl=en-US&gl=US&ceid=US:en
//! ```
//!
//! Feed items whose title does not mention the keyword are ignored, links
//! are de-duplicated within one feed, and at most [`MAX_FEED_ITEMS`] items
//! are kept per query.

use super::selectors::PageContext;
use crate::models::{RawArticle, WebsiteConfig};
use crate::utils::{collapse_whitespace, normalize_url};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;
use urlencoding::encode;

pub const DEFAULT_FEED_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Items kept per (website, keyword) query.
pub const MAX_FEED_ITEMS: usize = 5;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
}

/// Feed search URL for `keyword` restricted to `website`'s host.
pub fn feed_url(endpoint: &str, website: &WebsiteConfig, keyword: &str) -> String {
    let host = website.host();
    let site = host.strip_prefix("www.").unwrap_or(&host);
    let query = format!("\"{}\" site:{} when:2d", keyword.trim(), site);
    format!(
        "{}?q={}&hl=en-US&gl=US&ceid=US:en",
        endpoint.trim_end_matches('/'),
        encode(&query)
    )
}

/// Parse an RSS document into records. Malformed feeds yield no records.
pub fn parse_feed(xml: &str, ctx: &PageContext<'_>) -> Vec<RawArticle> {
    let rss: Rss = match quick_xml::de::from_str(xml) {
        Ok(rss) => rss,
        Err(e) => {
            debug!(website = ctx.website, error = %e, "Feed did not parse");
            return Vec::new();
        }
    };

    let needle = ctx.keyword.trim().to_lowercase();
    let mut seen_links = HashSet::new();
    let mut articles = Vec::new();

    for item in rss.channel.items {
        if articles.len() >= MAX_FEED_ITEMS {
            break;
        }
        let title = collapse_whitespace(&item.title);
        if !title.to_lowercase().contains(&needle) {
            continue;
        }
        let Some(url) = normalize_url(ctx.base_url, &item.link) else {
            continue;
        };
        if !seen_links.insert(url.clone()) {
            continue;
        }
        let summary = match item.pub_date.trim() {
            "" => String::new(),
            published => format!("Published {published}"),
        };
        articles.push(RawArticle {
            title,
            url,
            summary,
            language: ctx.language.to_string(),
            website: ctx.website.to_string(),
            keyword: ctx.keyword.to_string(),
        });
    }
    articles
}
