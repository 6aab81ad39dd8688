//! Image archiving to object storage.

use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;
use crate::storage::ObjectStore;

/// Content type for a file name, by extension (case-insensitive).
///
/// Unknown or missing extensions fall back to `image/png`.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Persists image bytes under a key prefix and reports the public URL.
#[derive(Clone)]
pub struct ImageArchiver {
    store: Arc<dyn ObjectStore>,
}

impl ImageArchiver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Store `bytes` at `{prefix}{filename}`.
    ///
    /// Returns the public URL, or `None` after logging when the store fails.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str, prefix: &str) -> Option<String> {
        let key = format!("{prefix}{filename}");
        let content_type = content_type_for(filename);

        match self.store.put_object(&key, bytes, content_type).await {
            Ok(()) => Some(self.store.public_url(&key)),
            Err(AppError::MissingCredentials(reason)) => {
                log::error!("Storage credentials not found, skipping {}: {}", filename, reason);
                None
            }
            Err(e) => {
                log::error!("Failed to upload {}: {}", filename, e);
                None
            }
        }
    }
}
