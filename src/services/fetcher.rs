//! Page and image fetching.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// Raw HTTP GET capability.
///
/// Implementations fail with [`AppError::Status`](crate::error::AppError::Status)
/// on non-success responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET `url` with the given User-Agent and return the raw body.
    async fn get_bytes(&self, url: &str, user_agent: &str) -> Result<Vec<u8>>;
}

/// Fetches pages as queryable documents and images as bytes.
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    image_user_agent: String,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>, image_user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            image_user_agent: image_user_agent.into(),
        }
    }

    /// Fetch a page and parse it.
    pub async fn fetch(&self, url: &str) -> Result<Document> {
        let text = self.transport.get_text(url).await?;
        Ok(Document::parse(&text))
    }

    /// Download image bytes with the browser-like User-Agent.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        self.transport.get_bytes(url, &self.image_user_agent).await
    }
}
