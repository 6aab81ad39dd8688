//! Detail page extraction.
//!
//! Detail pages are heterogeneous wiki content. A page that cannot be fetched
//! downgrades the entity to the `unknown` tag instead of aborting the run.

use crate::document::{Document, Query};
use crate::error::Result;
use crate::models::{DetailInfo, UNKNOWN_TAG};
use crate::services::PageFetcher;
use crate::utils::absolutize_scheme;

/// Class pattern identifying the info panel.
const PANEL_CLASS: &str = "infobox|roundy";

/// Href pattern identifying category links inside the panel.
const TYPE_HREF: &str = "/wiki/.*_type";

/// Extracts the image URL and category tags from an entity's detail page.
pub struct DetailExtractor {
    fetcher: PageFetcher,
    panel: Query,
    image: Query,
    type_link: Query,
}

impl DetailExtractor {
    pub fn new(fetcher: PageFetcher) -> Result<Self> {
        Ok(Self {
            fetcher,
            panel: Query::tag("table")?.attr_matches("class", PANEL_CLASS)?,
            image: Query::tag("img")?,
            type_link: Query::tag("a")?.attr_matches("href", TYPE_HREF)?,
        })
    }

    /// Fetch the detail page at `url` and extract from it.
    ///
    /// Fetch failures are logged and absorbed into [`DetailInfo::unknown`].
    pub async fn extract_image_and_tags(&self, url: &str) -> DetailInfo {
        match self.fetcher.fetch(url).await {
            Ok(document) => self.extract(&document),
            Err(e) => {
                log::warn!("Failed to fetch detail page {}: {}", url, e);
                DetailInfo::unknown()
            }
        }
    }

    /// Extract from an already fetched detail page.
    pub fn extract(&self, document: &Document) -> DetailInfo {
        let Some(panel) = document.find(&self.panel) else {
            log::debug!("No info panel found");
            return DetailInfo::no_panel();
        };

        let image_url = panel
            .find(&self.image)
            .and_then(|img| img.attr("src"))
            .filter(|src| !src.trim().is_empty())
            .map(absolutize_scheme);

        let mut tags: Vec<String> = panel
            .find_all(&self.type_link)
            .iter()
            .map(|link| link.text().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        if tags.is_empty() {
            tags.push(UNKNOWN_TAG.to_string());
        }

        DetailInfo { image_url, tags }
    }
}
