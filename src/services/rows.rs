//! Listing row extraction.

use regex::Regex;
use url::Url;

use crate::document::{Node, Query};
use crate::error::Result;
use crate::models::Entity;
use crate::utils::resolve_url;

/// Minimum number of cells in a data row.
const MIN_CELLS: usize = 3;

/// Turns listing table rows into [`Entity`] values.
pub struct RowExtractor {
    base_url: Url,
    digits: Regex,
    cell: Query,
    link: Query,
}

impl RowExtractor {
    /// Create an extractor resolving detail links against `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            digits: Regex::new(r"\d+")?,
            cell: Query::tag("td")?,
            link: Query::tag("a")?.has_attr("href"),
        })
    }

    /// Extract an entity from one row, or `None` if it is not a data row.
    ///
    /// A data row has at least three cells, a digit run in the first cell and
    /// a link with non-empty text somewhere in the row. Links wrapping only
    /// an image (sprites) are passed over in favour of the first text link.
    pub fn extract_entity(&self, row: Node<'_>) -> Option<Entity> {
        let cells = row.find_all(&self.cell);
        if cells.len() < MIN_CELLS {
            return None;
        }

        let first = cells[0].text();
        let index = self.digits.find(&first)?.as_str().parse::<u32>().ok()?;

        let (link, name) = row
            .find_all(&self.link)
            .into_iter()
            .map(|link| (link, link.text()))
            .find(|(_, name)| !name.is_empty())?;
        let href = link.attr("href")?;

        Some(Entity {
            index,
            name,
            detail_url: resolve_url(&self.base_url, href),
        })
    }
}
