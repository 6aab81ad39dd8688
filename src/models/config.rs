//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the catalog lives
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP and pacing behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Destination bucket and key layout
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("source.base_url", &self.source.base_url),
            ("source.list_url", &self.source.list_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| AppError::validation(format!("{field} is not a URL: {e}")))?;
            if !url.has_host() {
                return Err(AppError::validation(format!("{field} has no host")));
            }
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.image_user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.image_user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if !self.crawler.delay_secs.is_finite() || self.crawler.delay_secs < 0.0 {
            return Err(AppError::validation("crawler.delay_secs must be >= 0"));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(AppError::validation("storage.bucket is empty"));
        }
        if self.storage.domain.trim().is_empty() {
            return Err(AppError::validation("storage.domain is empty"));
        }
        if self.storage.key_root.trim_matches('/').is_empty() {
            return Err(AppError::validation("storage.key_root is empty"));
        }
        Ok(())
    }
}

/// Catalog location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Site root that relative detail links resolve against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Listing page holding the catalog tables
    #[serde(default = "defaults::list_url")]
    pub list_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            list_url: defaults::list_url(),
        }
    }
}

/// HTTP client and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for listing and detail pages
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// User-Agent header for image downloads
    #[serde(default = "defaults::image_user_agent")]
    pub image_user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause after each catalog row, in seconds
    #[serde(default = "defaults::delay")]
    pub delay_secs: f64,

    /// Maximum successful uploads per run
    #[serde(default = "defaults::limit")]
    pub limit: usize,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs.max(0.0))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            image_user_agent: defaults::image_user_agent(),
            timeout_secs: defaults::timeout(),
            delay_secs: defaults::delay(),
            limit: defaults::limit(),
        }
    }
}

/// Object storage destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket receiving the images
    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Storage domain used in public URLs
    #[serde(default = "defaults::domain")]
    pub domain: String,

    /// First key segment; objects land under `{key_root}/{tag}/`
    #[serde(default = "defaults::key_root")]
    pub key_root: String,

    /// Region override; the provider's default chain applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: defaults::bucket(),
            domain: defaults::domain(),
            key_root: defaults::key_root(),
            region: None,
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://bulbapedia.bulbagarden.net".into()
    }
    pub fn list_url() -> String {
        "https://bulbapedia.bulbagarden.net/wiki/List_of_Pok%C3%A9mon_by_National_Pok%C3%A9dex_number"
            .into()
    }

    pub fn user_agent() -> String {
        concat!("archiver/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn image_user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn delay() -> f64 {
        1.0
    }
    pub fn limit() -> usize {
        100
    }

    pub fn bucket() -> String {
        "pokemon-scraper-binks".into()
    }
    pub fn domain() -> String {
        "s3.amazonaws.com".into()
    }
    pub fn key_root() -> String {
        "images".into()
    }
}
