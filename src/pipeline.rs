//! The five-stage run: keywords, websites, discovery, deduplication, export.
//!
//! Stages run strictly in sequence and each one owns the list it is handed.
//! A configuration or export failure ends the run with a single [`RunError`];
//! everything softer (an unreachable site, an unusable candidate, an
//! unavailable export backend) is absorbed by the stage that met it.

use crate::config::ConfigSource;
use crate::dedupe::Deduplicator;
use crate::error::RunError;
use crate::models::{RawArticle, RunReport};
use crate::outputs::backend::DocumentService;
use crate::outputs::composer::{Composer, ExportOutcome};
use crate::scrapers::discovery::Discovery;
use crate::scrapers::fetch::FetchAsync;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Result of a successful run: the report and the unique article set it describes.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub articles: Vec<RawArticle>,
}

#[derive(Debug)]
pub struct Pipeline<F, S> {
    source: ConfigSource,
    discovery: Discovery<F>,
    deduplicator: Deduplicator,
    composer: Composer<S>,
}

impl<F, S> Pipeline<F, S>
where
    F: FetchAsync,
    S: DocumentService,
{
    pub fn new(
        source: ConfigSource,
        discovery: Discovery<F>,
        deduplicator: Deduplicator,
        composer: Composer<S>,
    ) -> Self {
        Self {
            source,
            discovery,
            deduplicator,
            composer,
        }
    }

    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        let started = Instant::now();

        let keywords = self.source.load_keywords().await?;
        let websites = self.source.load_websites().await?;

        let discovered = self.discovery.discover(&websites, &keywords).await;
        let discovered_count = discovered.len();

        let articles = self.deduplicator.dedupe(discovered);
        info!(
            discovered = discovered_count,
            unique = articles.len(),
            "Deduplication complete"
        );

        let outcome = self.composer.compose(&articles).await?;
        let placeholder_reason = match &outcome {
            ExportOutcome::Exported { document_id, .. } => {
                info!(%document_id, "Report document written");
                None
            }
            ExportOutcome::Placeholder { reason, .. } => {
                warn!(%reason, "Run finished without a real document");
                Some(reason.clone())
            }
        };

        let report = RunReport {
            document_url: outcome.url().to_string(),
            placeholder_reason,
            keywords: keywords.len(),
            websites: websites.len(),
            discovered: discovered_count,
            unique: articles.len(),
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(url = %report.document_url, unique = report.unique, "Run complete");
        Ok(RunOutcome { report, articles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ExportError};
    use crate::outputs::backend::ExportTarget;
    use crate::outputs::document::DocRequest;
    use crate::outputs::local::LocalDocStore;
    use crate::scrapers::discovery::DiscoverySettings;
    use crate::scrapers::fetch::HttpFetcher;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Accepts the document but rejects every batch.
    #[derive(Debug)]
    struct RejectingService;

    impl DocumentService for RejectingService {
        async fn create_document(&self, _title: &str) -> Result<String, ExportError> {
            Ok("doc-9".to_string())
        }

        async fn batch_update(
            &self,
            _id: &str,
            _requests: &[DocRequest],
        ) -> Result<(), ExportError> {
            Err(ExportError::Backend("HTTP 503".to_string()))
        }

        fn document_url(&self, id: &str) -> String {
            format!("mem://{id}")
        }
    }

    fn discovery() -> Discovery<HttpFetcher> {
        let settings = DiscoverySettings {
            timeout: Duration::from_millis(200),
            retry_pause: Duration::from_millis(5),
            pacing_min: Duration::from_millis(1),
            pacing_max: Duration::from_millis(2),
            ..DiscoverySettings::default()
        };
        Discovery::new(HttpFetcher::new(settings.timeout).unwrap(), settings)
    }

    async fn news_site() -> MockServer {
        let server = MockServer::start().await;
        let page = r#"<html><body>
            <article><h3>PM announces budget</h3><a href="/a">x</a></article>
            <article><h3>PM announces the budget today</h3><a href="/d">x</a></article>
            <article><h3>Completely different story</h3><a href="/c">x</a></article>
        </body></html>"#;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "budget"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;
        server
    }

    fn write_config(dir: &std::path::Path, site_url: &str) -> String {
        let path = dir.join("config.yaml");
        let yaml = format!(
            "keywords:\n  - {{ keyword: budget, language: English }}\n\
             websites:\n  - {{ name: Local News, url: \"{site_url}\", language: English }}\n"
        );
        std::fs::write(&path, yaml).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_full_run_to_local_store() {
        let server = news_site().await;
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &server.uri());
        let store_dir = dir.path().join("docs");

        let pipeline = Pipeline::new(
            ConfigSource::File(config),
            discovery(),
            Deduplicator::default(),
            Composer::new(ExportTarget::Available(LocalDocStore::new(&store_dir))),
        );
        let outcome = pipeline.run().await.unwrap();

        assert_eq!(outcome.report.keywords, 1);
        assert_eq!(outcome.report.websites, 1);
        assert_eq!(outcome.report.discovered, 3);
        assert_eq!(outcome.report.unique, 2);
        assert!(!outcome.report.is_placeholder());
        assert!(outcome.report.document_url.starts_with("file://"));

        let titles: Vec<_> = outcome.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["PM announces budget", "Completely different story"]);

        let written: Vec<_> = std::fs::read_dir(&store_dir).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_export_still_reports() {
        let server = news_site().await;
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &server.uri());

        let pipeline: Pipeline<_, LocalDocStore> = Pipeline::new(
            ConfigSource::File(config),
            discovery(),
            Deduplicator::default(),
            Composer::new(ExportTarget::Unavailable {
                reason: "no credentials".to_string(),
            }),
        );
        let outcome = pipeline.run().await.unwrap();
        assert!(outcome.report.is_placeholder());
        assert!(outcome.report.document_url.contains("/document/d/demo_"));
        assert_eq!(outcome.report.unique, 2);
    }

    #[tokio::test]
    async fn test_empty_config_is_fatal_before_discovery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "keywords: []\nwebsites: []\n").unwrap();

        let pipeline: Pipeline<_, LocalDocStore> = Pipeline::new(
            ConfigSource::File(path.to_string_lossy().to_string()),
            discovery(),
            Deduplicator::default(),
            Composer::new(ExportTarget::Unavailable {
                reason: "unused".to_string(),
            }),
        );
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, RunError::Config(ConfigError::Empty("keyword"))));
    }

    #[tokio::test]
    async fn test_incomplete_export_is_fatal() {
        let server = news_site().await;
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &server.uri());

        let pipeline = Pipeline::new(
            ConfigSource::File(config),
            discovery(),
            Deduplicator::default(),
            Composer::new(ExportTarget::Available(RejectingService)),
        );
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(
            err,
            RunError::Export(ExportError::Incomplete { committed_batches: 0, .. })
        ));
    }
}
