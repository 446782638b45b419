//! HTTP retrieval of receipt pages.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::models::config::FetchConfig;

/// Source of receipt documents.
pub trait DocumentFetcher {
    /// Fetch the document at `url` as text.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with a fixed timeout and browser identity.
///
/// One GET per call. Timeouts, connection failures and non-2xx answers are
/// returned as-is; there is no retry.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        validate_url(url)?;
        info!("Fetching receipt page {}", url);

        let network = |e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            reason: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        };

        let response = self.client.get(url).send().map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(network)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Reject input that cannot be a receipt portal address.
pub fn validate_url(url: &str) -> Result<(), FetchError> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(FetchError::InvalidUrl(url.to_string()))
    }
}
