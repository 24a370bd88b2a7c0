//! Remote page retrieval
//!
//! Pages are fetched with a plain GET of `proxy_prefix + url`; the prefix
//! points at a forwarding proxy and may be empty.

use crate::config::FetchConfig;
use crate::error::{AuditError, AuditResult};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Retrieves the HTML of a remote page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Return the page body; any non-2xx status or transport failure is
    /// [`AuditError::FetchFailed`]
    async fn fetch(&self, url: &str) -> AuditResult<String>;
}

/// reqwest-backed fetcher that routes requests through a URL-prefix proxy
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    proxy_prefix: String,
}

impl ProxyFetcher {
    pub fn new(config: &FetchConfig) -> AuditResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AuditError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            proxy_prefix: config.proxy_url.trim().to_string(),
        })
    }

    /// URL actually requested for `url`
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}{}", self.proxy_prefix, url)
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> AuditResult<String> {
        let target = self.proxied_url(url);
        debug!("Fetching {} via {}", url, target);

        let response = self.client.get(&target).send().await.map_err(|e| {
            warn!("Fetch of {} failed: {}", target, e);
            AuditError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch of {} returned {}", target, status);
            return Err(AuditError::fetch_failed_with_status(
                format!("HTTP error! status: {}", status.as_u16()),
                url,
                status.as_u16(),
            ));
        }

        let body = response.text().await.map_err(AuditError::from)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
