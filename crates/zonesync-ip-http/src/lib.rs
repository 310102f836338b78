// # HTTP Address Source
//
// This crate provides the HTTP(S) implementation of `zonesync_core::AddressSource`.
//
// ## Architecture
//
// Fetches the caller's public address from an external lookup service
// (e.g., ipinfo.io, api.ipify.org) that answers with the address as the
// whole response body. One request per run; any non-200 answer or a body
// that is not an address is a discovery failure.

use std::time::Duration;

use zonesync_core::config::DiscoveryConfig;
use zonesync_core::traits::AddressSource;
use zonesync_core::{Error, ObservedAddress, Result};

/// Default HTTP timeout for the lookup request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public address source
#[derive(Debug)]
pub struct HttpAddressSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressSource {
    /// Create a new HTTP address source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://ipinfo.io/ip")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::config("Discovery URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// Create an address source from configuration
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        config.validate()?;

        match config {
            DiscoveryConfig::Http { url } => {
                if url.starts_with("http://") {
                    tracing::warn!(
                        "Discovery URL uses HTTP (not HTTPS); the answer can be tampered with in transit"
                    );
                }
                Self::new(url.clone())
            }
        }
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl AddressSource for HttpAddressSource {
    async fn current(&self) -> Result<ObservedAddress> {
        tracing::debug!("Fetching public address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::discovery(format!("Request to {} failed: {}", self.url, e)))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Error::discovery(format!(
                "Public IP address not found: {} answered {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::discovery(format!("Failed to read response: {}", e)))?;

        ObservedAddress::parse(&body).map_err(|e| Error::discovery(e.to_string()))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
