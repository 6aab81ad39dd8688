//! AWS S3 storage implementation.
//!
//! Objects are written with a `public-read` ACL and addressed by the
//! virtual-hosted URL `https://{bucket}.{domain}/{key}`.

use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use crate::storage::{ObjectStore, public_object_url};

/// S3-backed object store.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    domain: String,
    /// Why credentials are unavailable, if they are
    credentials_error: Option<String>,
}

impl S3Store {
    /// Create a new S3 store over an existing client.
    pub fn new(client: Client, bucket: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            domain: domain.into(),
            credentials_error: None,
        }
    }

    /// Create an S3 store from the AWS default chain and storage settings.
    ///
    /// Credentials are resolved once here. When they cannot be resolved the
    /// store is still returned and every put reports missing credentials.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let credentials_error = match sdk_config.credentials_provider() {
            None => Some("no credentials provider configured".to_string()),
            Some(provider) => provider
                .provide_credentials()
                .await
                .err()
                .map(|e| DisplayErrorContext(e).to_string()),
        };
        if let Some(reason) = &credentials_error {
            log::error!("AWS credentials not found: {}", reason);
        }

        let store = Self {
            credentials_error,
            ..Self::new(Client::new(&sdk_config), &config.bucket, &config.domain)
        };
        log::info!("Archiving to s3://{}", store.bucket);
        Ok(store)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        if let Some(reason) = &self.credentials_error {
            return Err(AppError::MissingCredentials(reason.clone()));
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::storage(DisplayErrorContext(e)))?;

        log::debug!("Wrote s3://{}/{}", self.bucket, key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.bucket, &self.domain, key)
    }
}
