//! In-memory transport and store for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::services::Transport;
use crate::storage::{ObjectStore, public_object_url};

/// Serves canned pages and images; anything else is a 404.
#[derive(Default)]
pub struct StaticTransport {
    pages: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    image_agents: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_image(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }

    /// User-Agent of every image request, in order.
    pub fn image_agents(&self) -> Vec<String> {
        self.image_agents.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::status(url, 404))
    }

    async fn get_bytes(&self, url: &str, user_agent: &str) -> Result<Vec<u8>> {
        self.image_agents
            .lock()
            .unwrap()
            .push(user_agent.to_string());
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::status(url, 404))
    }
}

/// Failure mode for [`MemoryStore`].
#[derive(Debug, Clone, Copy)]
pub enum StoreFailure {
    MissingCredentials,
    Service,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Records puts in memory; can be told to fail every put.
pub struct MemoryStore {
    bucket: String,
    domain: String,
    failure: Option<StoreFailure>,
    objects: Mutex<Vec<StoredObject>>,
}

impl MemoryStore {
    pub fn new(bucket: &str, domain: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            domain: domain.to_string(),
            failure: None,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, failure: StoreFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        match self.failure {
            Some(StoreFailure::MissingCredentials) => {
                Err(AppError::MissingCredentials("test store".to_string()))
            }
            Some(StoreFailure::Service) => Err(AppError::storage("AccessDenied")),
            None => {
                self.objects.lock().unwrap().push(StoredObject {
                    key: key.to_string(),
                    body,
                    content_type: content_type.to_string(),
                });
                Ok(())
            }
        }
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.bucket, &self.domain, key)
    }
}
