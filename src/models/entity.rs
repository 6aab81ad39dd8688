//! Catalog entry data structures.

use url::Url;

/// Tag used when a detail panel yields no category links.
pub const UNKNOWN_TAG: &str = "unknown";

/// Extension used when the image URL path carries none.
pub const DEFAULT_EXTENSION: &str = ".png";

/// One catalog item parsed from a listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Ordinal position in the source catalog
    pub index: u32,

    /// Display name, taken from the row's link text
    pub name: String,

    /// Absolute URL of the item's detail page
    pub detail_url: String,
}

impl Entity {
    /// Zero-padded index, e.g. `0004`.
    pub fn padded_index(&self) -> String {
        format!("{:04}", self.index)
    }
}

/// What a detail page told us about an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailInfo {
    /// Absolute image URL, if the panel has one
    pub image_url: Option<String>,

    /// Lower-cased category tags in encounter order
    pub tags: Vec<String>,
}

impl DetailInfo {
    /// Result for a page that could not be fetched.
    pub fn unknown() -> Self {
        Self {
            image_url: None,
            tags: vec![UNKNOWN_TAG.to_string()],
        }
    }

    /// Result for a page without an info panel.
    pub fn no_panel() -> Self {
        Self {
            image_url: None,
            tags: Vec::new(),
        }
    }

    /// The tag that drives the storage prefix.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map_or(UNKNOWN_TAG, String::as_str)
    }
}

/// An entity enriched with detail data and ready for download + upload.
///
/// Only constructible when an image URL exists, so the upload path never
/// sees a missing image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    pub image_url: String,
    pub tags: Vec<String>,
    /// Storage key prefix, e.g. `images/fire/`
    pub prefix: String,
    /// Object file name, e.g. `0004_Charmander.png`
    pub filename: String,
}

impl ArchiveJob {
    /// Plan the archive step for `entity`. Returns `None` when no image was found.
    pub fn plan(entity: &Entity, detail: DetailInfo, key_root: &str) -> Option<Self> {
        let prefix = format!("{}/{}/", key_root.trim_end_matches('/'), detail.primary_tag());
        let image_url = detail.image_url?;
        let filename = format!(
            "{}_{}{}",
            entity.padded_index(),
            entity.name,
            image_extension(&image_url)
        );

        Some(Self {
            image_url,
            tags: detail.tags,
            prefix,
            filename,
        })
    }
}

/// Extension (with the leading dot) of the image URL's last path segment.
///
/// Case is preserved. Falls back to [`DEFAULT_EXTENSION`].
pub fn image_extension(image_url: &str) -> String {
    let path = Url::parse(image_url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or("");

    // A leading dot alone (".hidden") is a name, not an extension.
    match segment.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < segment.len() => segment[idx..].to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
