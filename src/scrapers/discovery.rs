//! The discovery sweep over (website, keyword) pairs.
//!
//! Keywords are partitioned by language; every website is searched with
//! each keyword of its own language, in input order. Each pair is one
//! search request (retried on transient failures) followed by one parse.
//! A pair that cannot be retrieved contributes nothing and the sweep moves
//! on; nothing here can fail the run.
//!
//! Requests are grouped into lanes. A lane is worked through one request at
//! a time with a randomized pause before every request but the first:
//!
//! - `workers == 1`: a single lane holding every pair
//! - `workers > 1`: one lane per requested host, so a host is never hit
//!   concurrently or without a pause, even when several websites (or every
//!   feed query) resolve to it
//!
//! Results are returned in pair order regardless of completion order.

use super::extract::{ExtractLimits, extract_articles};
use super::fetch::{FetchAsync, RetryFetch};
use super::rss::{DEFAULT_FEED_ENDPOINT, feed_url, parse_feed};
use super::search::build_search_url;
use super::selectors::PageContext;
use crate::models::{KeywordConfig, RawArticle, WebsiteConfig};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

/// How a (website, keyword) pair is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DiscoveryMode {
    /// Scrape the site's own search results page.
    #[default]
    Search,
    /// Query a news RSS search endpoint restricted to the site.
    Rss,
}

/// Tunables for one discovery sweep.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub mode: DiscoveryMode,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub max_attempts: usize,
    /// Pause after a failed attempt.
    pub retry_pause: Duration,
    /// Randomized pause between successive requests in one lane.
    pub pacing_min: Duration,
    pub pacing_max: Duration,
    pub limits: ExtractLimits,
    /// Lanes worked concurrently.
    pub workers: usize,
    pub feed_endpoint: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            mode: DiscoveryMode::Search,
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            retry_pause: Duration::from_secs(2),
            pacing_min: Duration::from_secs(1),
            pacing_max: Duration::from_secs(2),
            limits: ExtractLimits::default(),
            workers: 1,
            feed_endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
        }
    }
}

/// One (website, keyword) request, numbered in sweep order.
#[derive(Debug)]
struct Pair<'a> {
    index: usize,
    website: &'a WebsiteConfig,
    keyword: &'a str,
    url: String,
}

/// Pairs worked through sequentially, labelled by the host they hit.
type Lane<'a> = (String, Vec<Pair<'a>>);

/// Discovery engine over any page fetcher.
#[derive(Debug)]
pub struct Discovery<F> {
    fetcher: RetryFetch<F>,
    settings: DiscoverySettings,
}

impl<F> Discovery<F>
where
    F: FetchAsync,
{
    pub fn new(fetcher: F, settings: DiscoverySettings) -> Self {
        let fetcher = RetryFetch::new(fetcher, settings.max_attempts, settings.retry_pause);
        Self { fetcher, settings }
    }

    /// Search every website with its language's keywords.
    ///
    /// Output order is website order, then keyword order within a website.
    #[instrument(
        level = "info",
        skip_all,
        fields(websites = websites.len(), keywords = keywords.len())
    )]
    pub async fn discover(
        &self,
        websites: &[WebsiteConfig],
        keywords: &[KeywordConfig],
    ) -> Vec<RawArticle> {
        let pairs = self.pairs(websites, keywords);
        let lanes = self.lanes(pairs);
        info!(lanes = lanes.len(), workers = self.settings.workers, "Starting discovery");

        let mut results: Vec<(usize, Vec<RawArticle>)> = stream::iter(lanes)
            .map(|(host, pairs)| self.sweep_lane(host, pairs))
            .buffer_unordered(self.settings.workers.max(1))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();
        results.sort_by_key(|(index, _)| *index);

        let articles: Vec<RawArticle> = results
            .into_iter()
            .flat_map(|(_, found)| found)
            .collect();
        info!(count = articles.len(), "Discovery finished");
        articles
    }

    /// Every (website, matching keyword) pair with its request URL, in sweep order.
    fn pairs<'a>(
        &self,
        websites: &'a [WebsiteConfig],
        keywords: &'a [KeywordConfig],
    ) -> Vec<Pair<'a>> {
        let by_language: HashMap<&str, Vec<&KeywordConfig>> = keywords
            .iter()
            .into_group_map_by(|k| k.language.as_str());

        let mut pairs = Vec::new();
        for website in websites {
            let Some(matching) = by_language.get(website.language.as_str()) else {
                warn!(
                    website = %website.name,
                    language = %website.language,
                    "No keywords for this website's language; skipping"
                );
                continue;
            };
            for &keyword in matching {
                pairs.push(Pair {
                    index: pairs.len(),
                    website,
                    keyword: &keyword.keyword,
                    url: self.request_url(website, &keyword.keyword),
                });
            }
        }
        pairs
    }

    fn request_url(&self, website: &WebsiteConfig, keyword: &str) -> String {
        match self.settings.mode {
            DiscoveryMode::Search => build_search_url(website, keyword),
            DiscoveryMode::Rss => feed_url(&self.settings.feed_endpoint, website, keyword),
        }
    }

    /// Split pairs into lanes: one lane when sequential, else one per requested host.
    fn lanes<'a>(&self, pairs: Vec<Pair<'a>>) -> Vec<Lane<'a>> {
        if self.settings.workers <= 1 {
            return vec![("*".to_string(), pairs)];
        }

        let mut lanes: Vec<Lane<'a>> = Vec::new();
        for pair in pairs {
            let host = request_host(&pair.url);
            match lanes.iter_mut().find(|(h, _)| *h == host) {
                Some((_, lane)) => lane.push(pair),
                None => lanes.push((host, vec![pair])),
            }
        }
        lanes
    }

    #[instrument(level = "info", skip_all, fields(host = %host, pairs = pairs.len()))]
    async fn sweep_lane(
        &self,
        host: String,
        pairs: Vec<Pair<'_>>,
    ) -> Vec<(usize, Vec<RawArticle>)> {
        let mut results = Vec::with_capacity(pairs.len());
        for (i, pair) in pairs.iter().enumerate() {
            if i > 0 {
                self.pace().await;
            }
            let found = self.search_pair(pair).await;
            info!(
                website = %pair.website.name,
                keyword = %pair.keyword,
                count = found.len(),
                "Searched website"
            );
            results.push((pair.index, found));
        }
        results
    }

    /// Retrieve and parse one (website, keyword) pair; empty on failure.
    async fn search_pair(&self, pair: &Pair<'_>) -> Vec<RawArticle> {
        let body = match self.fetcher.fetch(&pair.url).await {
            Ok(body) => body,
            Err(e) => {
                error!(
                    url = %pair.url,
                    keyword = pair.keyword,
                    error = %e,
                    "Search failed; skipping pair"
                );
                return Vec::new();
            }
        };

        let ctx = PageContext {
            base_url: &pair.website.url,
            language: &pair.website.language,
            website: &pair.website.name,
            keyword: pair.keyword,
        };
        match self.settings.mode {
            DiscoveryMode::Search => extract_articles(&body, &ctx, &self.settings.limits),
            DiscoveryMode::Rss => parse_feed(&body, &ctx),
        }
    }

    async fn pace(&self) {
        let min = self.settings.pacing_min.as_millis() as u64;
        let max = (self.settings.pacing_max.as_millis() as u64).max(min);
        let ms = rand::rng().random_range(min..=max);
        sleep(Duration::from_millis(ms)).await;
    }
}

/// Lowercased host a request URL targets; the raw URL when it does not parse.
fn request_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| url.to_string())
}
