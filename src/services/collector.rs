//! Collection orchestrator.
//!
//! Drives the end-to-end pass: listing page, rows, detail pages, image
//! download, upload. Strictly sequential, one request in flight. Only the
//! listing fetch may fail the run; every per-row failure becomes a log line
//! and a skip.

use std::sync::Arc;
use std::time::Duration;

use crate::document::{Document, Query};
use crate::error::Result;
use crate::models::{ArchiveJob, Config, Entity};
use crate::services::{DetailExtractor, ImageArchiver, PageFetcher, RowExtractor, Transport};
use crate::storage::ObjectStore;

/// Class pattern identifying catalog tables on the listing page.
const LISTING_CLASS: &str = "roundy|sortable";

/// Per-run settings, taken from [`Config`].
#[derive(Debug, Clone)]
pub struct CollectSettings {
    pub list_url: String,
    pub base_url: String,
    pub delay: Duration,
    pub key_root: String,
    pub image_user_agent: String,
}

impl CollectSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            list_url: config.source.list_url.clone(),
            base_url: config.source.base_url.clone(),
            delay: config.crawler.delay(),
            key_root: config.storage.key_root.clone(),
            image_user_agent: config.crawler.image_user_agent.clone(),
        }
    }
}

/// Summary of a collection run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectReport {
    /// Rows that produced an entity and were processed
    pub rows_visited: usize,
    /// Confirmed uploads
    pub uploaded: usize,
    pub skipped_no_image: usize,
    pub download_failures: usize,
    pub upload_failures: usize,
    /// Inter-row pauses taken
    pub delays_applied: usize,
    /// Run stopped because the upload limit was hit
    pub limit_reached: bool,
}

impl CollectReport {
    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Uploaded => self.uploaded += 1,
            RowOutcome::NoImage => self.skipped_no_image += 1,
            RowOutcome::DownloadFailed => self.download_failures += 1,
            RowOutcome::UploadFailed => self.upload_failures += 1,
        }
    }
}

/// How a single visited row ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowOutcome {
    Uploaded,
    NoImage,
    DownloadFailed,
    UploadFailed,
}

/// Orchestrates a full collection run.
pub struct Collector {
    fetcher: PageFetcher,
    rows: RowExtractor,
    details: DetailExtractor,
    archiver: ImageArchiver,
    listing_table: Query,
    table_row: Query,
    settings: CollectSettings,
}

impl Collector {
    /// Build a collector over the given transport and object store.
    pub fn new(
        settings: CollectSettings,
        transport: Arc<dyn Transport>,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self> {
        let fetcher = PageFetcher::new(transport, settings.image_user_agent.clone());

        Ok(Self {
            rows: RowExtractor::new(&settings.base_url)?,
            details: DetailExtractor::new(fetcher.clone())?,
            archiver: ImageArchiver::new(store),
            listing_table: Query::tag("table")?.attr_matches("class", LISTING_CLASS)?,
            table_row: Query::tag("tr")?,
            fetcher,
            settings,
        })
    }

    /// Run one pass, stopping after `limit` successful uploads.
    ///
    /// Fails only when the listing page cannot be fetched.
    pub async fn collect(&self, limit: usize) -> Result<CollectReport> {
        let entities = {
            let listing = self.fetcher.fetch(&self.settings.list_url).await?;
            self.listing_entities(&listing)
        };
        log::debug!("Listing yielded {} candidate entries", entities.len());

        let mut report = CollectReport::default();
        for entity in &entities {
            if report.uploaded >= limit {
                log::info!("Limit reached ({} uploads)", limit);
                report.limit_reached = true;
                break;
            }

            report.rows_visited += 1;
            let outcome = self.process(entity).await;
            report.record(&outcome);

            self.pace(&mut report).await;
        }
        if !report.limit_reached && report.uploaded >= limit {
            log::info!("Limit reached ({} uploads)", limit);
            report.limit_reached = true;
        }

        Ok(report)
    }

    /// Entities from every catalog table, in document order.
    fn listing_entities(&self, listing: &Document) -> Vec<Entity> {
        listing
            .find_all(&self.listing_table)
            .iter()
            .flat_map(|table| table.find_all(&self.table_row))
            .filter_map(|row| self.rows.extract_entity(row))
            .collect()
    }

    async fn process(&self, entity: &Entity) -> RowOutcome {
        log::info!("Processing #{} {}", entity.padded_index(), entity.name);

        let detail = self
            .details
            .extract_image_and_tags(&entity.detail_url)
            .await;
        let Some(job) = ArchiveJob::plan(entity, detail, &self.settings.key_root) else {
            log::warn!("No image found for {}", entity.name);
            return RowOutcome::NoImage;
        };

        let bytes = match self.fetcher.fetch_image(&job.image_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to download {}: {}", job.image_url, e);
                return RowOutcome::DownloadFailed;
            }
        };

        match self.archiver.upload(bytes, &job.filename, &job.prefix).await {
            Some(url) => {
                log::info!("Uploaded: {}", url);
                RowOutcome::Uploaded
            }
            None => RowOutcome::UploadFailed,
        }
    }

    /// Courtesy pause after every visited row, whatever its outcome.
    async fn pace(&self, report: &mut CollectReport) {
        report.delays_applied += 1;
        if !self.settings.delay.is_zero() {
            tokio::time::sleep(self.settings.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::{MemoryStore, StaticTransport, StoreFailure};

    const BASE: &str = "https://wiki.example";
    const LIST: &str = "https://wiki.example/wiki/List";

    fn settings(delay: Duration) -> CollectSettings {
        CollectSettings {
            list_url: LIST.to_string(),
            base_url: BASE.to_string(),
            delay,
            key_root: "images".to_string(),
            image_user_agent: "Mozilla/5.0".to_string(),
        }
    }

    fn row(index: u32, name: &str) -> String {
        format!("<tr><td>#{index:04}</td><td><a href=\"/wiki/{name}\">{name}</a></td><td>x</td></tr>")
    }

    fn detail(image: &str, tags: &[&str]) -> String {
        let links: String = tags
            .iter()
            .map(|t| format!("<a href=\"/wiki/{t}_type\">{t}</a>"))
            .collect();
        format!("<table class=\"roundy\"><tr><td><img src=\"{image}\">{links}</td></tr></table>")
    }

    /// Listing with `names.len()` valid rows, each with a detail page and image.
    fn catalog(names: &[&str]) -> StaticTransport {
        let rows: String = names
            .iter()
            .enumerate()
            .map(|(i, n)| row(i as u32 + 1, n))
            .collect();
        let mut transport = StaticTransport::new().with_page(
            LIST,
            &format!(
                "<table class=\"sortable\"><tr><th>#</th><th>Name</th><th>Type</th></tr>{rows}</table>"
            ),
        );
        for name in names {
            transport = transport
                .with_page(
                    &format!("{BASE}/wiki/{name}"),
                    &detail(&format!("//cdn.example/{name}.png"), &["Fire"]),
                )
                .with_image(&format!("https://cdn.example/{name}.png"), name.as_bytes().to_vec());
        }
        transport
    }

    fn collector(transport: StaticTransport, store: Arc<MemoryStore>, delay: Duration) -> Collector {
        Collector::new(settings(delay), Arc::new(transport), store).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_stops_after_exact_uploads() {
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let transport = Arc::new(catalog(&["A", "B", "C", "D", "E"]));
        let collector = Collector::new(
            settings(Duration::from_secs(1)),
            transport.clone(),
            store.clone(),
        )
        .unwrap();

        let start = tokio::time::Instant::now();
        let report = collector.collect(2).await.unwrap();

        assert_eq!(report.uploaded, 2);
        assert_eq!(report.rows_visited, 2);
        assert_eq!(report.delays_applied, 2);
        assert!(report.limit_reached);
        assert_eq!(store.objects().len(), 2);
        assert_eq!(transport.image_agents().len(), 2);
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_keys_and_urls() {
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let report = collector(catalog(&["Charmander"]), store.clone(), Duration::ZERO)
            .collect(10)
            .await
            .unwrap();

        assert_eq!(report.uploaded, 1);
        assert!(!report.limit_reached);
        let objects = store.objects();
        assert_eq!(objects[0].key, "images/fire/0001_Charmander.png");
        assert_eq!(objects[0].content_type, "image/png");
        assert_eq!(objects[0].body, b"Charmander".to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skipped_rows_are_still_paced() {
        // A: detail page missing, B: no image, C: image download fails, D: ok
        let rows = [row(1, "A"), row(2, "B"), row(3, "C"), row(4, "D")].concat();
        let transport = StaticTransport::new()
            .with_page(LIST, &format!("<table class=\"roundy\">{rows}</table>"))
            .with_page(
                &format!("{BASE}/wiki/B"),
                "<table class=\"infobox\"><tr><td><a href=\"/wiki/Fire_type\">Fire</a></td></tr></table>",
            )
            .with_page(&format!("{BASE}/wiki/C"), &detail("//cdn.example/C.png", &["Water"]))
            .with_page(&format!("{BASE}/wiki/D"), &detail("//cdn.example/D.gif", &["Grass"]))
            .with_image("https://cdn.example/D.gif", vec![1]);
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));

        let start = tokio::time::Instant::now();
        let report = collector(transport, store.clone(), Duration::from_millis(500))
            .collect(2)
            .await
            .unwrap();

        assert_eq!(
            report,
            CollectReport {
                rows_visited: 4,
                uploaded: 1,
                skipped_no_image: 2,
                download_failures: 1,
                upload_failures: 0,
                delays_applied: 4,
                limit_reached: false,
            }
        );
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(store.objects()[0].key, "images/grass/0004_D.gif");
        assert_eq!(store.objects()[0].content_type, "image/gif");
    }

    #[tokio::test]
    async fn test_upload_failure_does_not_count() {
        let store = Arc::new(
            MemoryStore::new("bucket", "s3.example.com").failing(StoreFailure::MissingCredentials),
        );
        let report = collector(catalog(&["A", "B", "C"]), store, Duration::ZERO)
            .collect(2)
            .await
            .unwrap();

        assert_eq!(report.uploaded, 0);
        assert_eq!(report.upload_failures, 3);
        assert_eq!(report.rows_visited, 3);
        assert!(!report.limit_reached);
    }

    #[tokio::test]
    async fn test_limit_is_global_across_tables() {
        let transport = catalog(&["A", "B", "C"]);
        let transport = transport.with_page(
            LIST,
            &format!(
                "<table class=\"roundy\">{}</table><table class=\"wikitable\">{}</table><table class=\"sortable\">{}{}</table>",
                row(1, "A"),
                row(9, "Ignored"),
                row(2, "B"),
                row(3, "C"),
            ),
        );
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let report = collector(transport, store.clone(), Duration::ZERO)
            .collect(2)
            .await
            .unwrap();

        assert_eq!(report.uploaded, 2);
        assert!(report.limit_reached);
        let keys: Vec<String> = store.objects().into_iter().map(|o| o.key).collect();
        assert_eq!(keys, vec!["images/fire/0001_A.png", "images/fire/0002_B.png"]);
    }

    #[tokio::test]
    async fn test_limit_hit_on_last_data_row() {
        let rows = [row(1, "A"), row(2, "B")].concat();
        let transport = catalog(&["A", "B"]).with_page(
            LIST,
            &format!(
                "<table class=\"sortable\">{rows}<tr><th colspan=\"3\">Generation II</th></tr></table>"
            ),
        );
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let report = collector(transport, store.clone(), Duration::ZERO)
            .collect(2)
            .await
            .unwrap();

        assert_eq!(report.uploaded, 2);
        assert_eq!(report.rows_visited, 2);
        assert!(report.limit_reached);
    }

    #[tokio::test]
    async fn test_zero_limit_uploads_nothing() {
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let report = collector(catalog(&["A"]), store.clone(), Duration::ZERO)
            .collect(0)
            .await
            .unwrap();

        assert_eq!(report.rows_visited, 0);
        assert!(report.limit_reached);
        assert!(store.objects().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let store = Arc::new(MemoryStore::new("bucket", "s3.example.com"));
        let result = collector(StaticTransport::new(), store, Duration::ZERO)
            .collect(5)
            .await;
        assert!(matches!(result, Err(AppError::Status { status: 404, .. })));
    }
}
