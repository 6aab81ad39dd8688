//! Object storage backends for archived images.
//!
//! ## Key Layout
//!
//! ```text
//! {bucket}/
//! └── images/
//!     ├── fire/
//!     │   └── 0004_Charmander.png
//!     └── unknown/
//!         └── 0201_Unown.png
//! ```

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Trait for object storage backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` with public-read visibility.
    ///
    /// Missing credentials are reported as
    /// [`AppError::MissingCredentials`](crate::error::AppError::MissingCredentials),
    /// anything else the backend rejects as
    /// [`AppError::Storage`](crate::error::AppError::Storage).
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL of the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Public URL for a bucket-hosted object: `https://{bucket}.{domain}/{key}`.
pub fn public_object_url(bucket: &str, domain: &str, key: &str) -> String {
    format!(
        "https://{}.{}/{}",
        bucket,
        domain.trim_matches('/'),
        key.trim_start_matches('/')
    )
}
