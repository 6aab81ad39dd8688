// src/utils/http.rs

//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::services::Transport;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }

    async fn get(&self, url: &str, user_agent: Option<&str>) -> Result<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(url, status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.get(url, None).await?.text().await?)
    }

    async fn get_bytes(&self, url: &str, user_agent: &str) -> Result<Vec<u8>> {
        let bytes = self.get(url, Some(user_agent)).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
