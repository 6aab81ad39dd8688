//! Pipeline entry points.
//!
//! - `run_collect`: Crawl the catalog and archive every entry's image

pub mod collect;

pub use collect::{open_store, run_collect};
