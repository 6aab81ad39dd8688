// src/pipeline/collect.rs

//! Catalog collection pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CollectReport, CollectSettings, Collector};
use crate::storage::{LocalStore, ObjectStore};
use crate::utils::http::HttpTransport;

/// Pick the object store for a run.
///
/// A local directory wins when given; otherwise the configured S3 bucket.
pub async fn open_store(config: &Config, local_dir: Option<&Path>) -> Result<Arc<dyn ObjectStore>> {
    if let Some(dir) = local_dir {
        log::info!("Archiving to local directory {}", dir.display());
        return Ok(Arc::new(LocalStore::new(dir)));
    }

    #[cfg(feature = "s3")]
    {
        let store = crate::storage::S3Store::from_config(&config.storage).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "s3"))]
    {
        Err(crate::error::AppError::config(format!(
            "built without S3 support; pass an output directory instead of bucket '{}'",
            config.storage.bucket
        )))
    }
}

/// Run one collection pass against `store`.
pub async fn run_collect(config: &Config, store: Arc<dyn ObjectStore>) -> Result<CollectReport> {
    let started = Instant::now();
    let limit = config.crawler.limit;
    log::info!(
        "Collecting up to {} images from {}",
        limit,
        config.source.list_url
    );

    let transport = Arc::new(HttpTransport::from_config(&config.crawler)?);
    let collector = Collector::new(CollectSettings::from_config(config), transport, store)?;
    let report = collector.collect(limit).await?;

    log::info!(
        "Run complete in {:.1}s: {} uploaded, {} rows visited, {} without image, {} download failures, {} upload failures",
        started.elapsed().as_secs_f64(),
        report.uploaded,
        report.rows_visited,
        report.skipped_no_image,
        report.download_failures,
        report.upload_failures
    );

    Ok(report)
}
