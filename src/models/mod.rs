// src/models/mod.rs

//! Domain models for the archiver.

mod config;
mod entity;

// Re-export all public types
pub use config::{Config, CrawlerConfig, SourceConfig, StorageConfig};
pub use entity::{
    ArchiveJob, DEFAULT_EXTENSION, DetailInfo, Entity, UNKNOWN_TAG, image_extension,
};
