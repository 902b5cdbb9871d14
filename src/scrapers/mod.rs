//! Article discovery: search requests, retrieval and markup extraction.
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`selectors`] | Ordered CSS rules for containers, titles, links and summaries |
//! | [`extract`] | Walks the container rules over one parsed page |
//! | [`search`] | Builds a site's search URL from its host |
//! | [`rss`] | Feed-based alternative to scraping search pages |
//! | [`fetch`] | HTTP retrieval with User-Agent rotation and retries |
//! | [`discovery`] | The (website, keyword) sweep tying the above together |
//!
//! Failures are absorbed at the smallest possible scope: a candidate that
//! does not yield a record is dropped, a pair that cannot be retrieved
//! contributes nothing, and the sweep always completes.

pub mod discovery;
pub mod extract;
pub mod fetch;
pub mod rss;
pub mod search;
pub mod selectors;
