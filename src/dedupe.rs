//! Three-pass duplicate removal over discovered articles.
//!
//! 1. **URL**: first occurrence of each case-insensitive URL wins
//! 2. **Title**: first occurrence of each case-insensitive, trimmed title wins
//! 3. **Similarity**: of any two titles scoring at or above the threshold,
//!    the earlier one survives
//!
//! Every pass preserves order and is idempotent on its own output. Articles
//! with an empty key are never removed by the pass keyed on it.
//!
//! The similarity pass compares all remaining pairs, which is fine for the
//! low hundreds of articles a run produces.

use crate::models::RawArticle;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Default similarity threshold at or above which two titles are duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy)]
pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Run all three passes in order.
    #[instrument(level = "info", skip_all, fields(input = articles.len()))]
    pub fn dedupe(&self, articles: Vec<RawArticle>) -> Vec<RawArticle> {
        let articles = remove_url_duplicates(articles);
        info!(count = articles.len(), "After URL deduplication");

        let articles = remove_title_duplicates(articles);
        info!(count = articles.len(), "After title deduplication");

        let articles = self.remove_similar_titles(articles);
        info!(count = articles.len(), "After similarity deduplication");

        articles
    }

    /// Drop every article whose title is too close to an earlier survivor's.
    pub fn remove_similar_titles(&self, articles: Vec<RawArticle>) -> Vec<RawArticle> {
        let keys: Vec<String> = articles.iter().map(|a| title_key(&a.title)).collect();
        let mut removed = vec![false; articles.len()];

        for i in 0..articles.len() {
            if removed[i] {
                continue;
            }
            for j in (i + 1)..articles.len() {
                if removed[j] {
                    continue;
                }
                let score = title_similarity(&keys[i], &keys[j]);
                if score >= self.threshold {
                    debug!(
                        kept = %articles[i].title,
                        removed = %articles[j].title,
                        similarity = score,
                        "Removing similar article"
                    );
                    removed[j] = true;
                }
            }
        }

        articles
            .into_iter()
            .zip(removed)
            .filter_map(|(article, gone)| (!gone).then_some(article))
            .collect()
    }
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Keep the first article per key; empty keys are always kept.
fn keep_first_by<F>(articles: Vec<RawArticle>, key: F) -> Vec<RawArticle>
where
    F: Fn(&RawArticle) -> String,
{
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| {
            let k = key(article);
            k.is_empty() || seen.insert(k)
        })
        .collect()
}

pub fn remove_url_duplicates(articles: Vec<RawArticle>) -> Vec<RawArticle> {
    keep_first_by(articles, |a| a.url.trim().to_lowercase())
}

pub fn remove_title_duplicates(articles: Vec<RawArticle>) -> Vec<RawArticle> {
    keep_first_by(articles, |a| title_key(&a.title))
}

/// Similarity of two titles in `[0, 1]` (Jaro-Winkler). Empty input scores 0.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::jaro_winkler(a, b)
}
