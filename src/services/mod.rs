//! Service layer for the archiver.
//!
//! This module contains the pipeline stages:
//! - Page and image fetching (`PageFetcher` over a `Transport`)
//! - Listing row parsing (`RowExtractor`)
//! - Detail page parsing (`DetailExtractor`)
//! - Image persistence (`ImageArchiver`)
//! - End-to-end orchestration (`Collector`)

mod archiver;
mod collector;
mod detail;
mod fetcher;
mod rows;

pub use archiver::{ImageArchiver, content_type_for};
pub use collector::{CollectReport, CollectSettings, Collector};
pub use detail::DetailExtractor;
pub use fetcher::{PageFetcher, Transport};
pub use rows::RowExtractor;
