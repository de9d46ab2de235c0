//! URL validation and page fetching.
//!
//! [`validate_url`] is the synchronous guard every extraction starts with.
//! The [`Fetcher`] trait is the seam between the pipeline and the network;
//! [`HttpFetcher`] is its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use url::Url;

use crate::{ExtractionError, Result};

/// Desktop Chrome user agent. Many sites refuse requests from default or
/// bot-looking agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Upper bound for the whole request, body included.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Accept header value.
    pub accept: String,
    /// Accept-Language header value.
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL of the final response after redirects. Relative links resolve
    /// against this, not against the requested URL.
    pub final_url: Url,
    /// Response status code (always below 400).
    pub status: u16,
    /// Response body decoded as text.
    pub html: String,
}

/// Retrieves the HTML of a validated URL.
///
/// Implementations make a single attempt; retries belong to the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

/// Validates raw input as an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidUrl`] for empty input, malformed syntax,
/// other schemes and URLs without a host.
pub fn validate_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExtractionError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(raw).map_err(|e| ExtractionError::InvalidUrl(format!("{raw}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ExtractionError::InvalidUrl(format!(
                "unsupported scheme '{other}', only http and https are allowed"
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ExtractionError::InvalidUrl(format!("{raw}: missing host")));
    }

    Ok(url)
}

/// reqwest-backed [`Fetcher`].
///
/// The client is built once and reused; redirects are followed with
/// reqwest's default policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds a fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Internal`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| ExtractionError::Internal {
            message: "failed to build HTTP client".to_string(),
            details: Some(e.to_string()),
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let timeout = self.config.timeout;

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, &self.config.accept)
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .send()
            .await
            .map_err(|e| ExtractionError::from_reqwest(e, timeout))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(%url, status = status.as_u16(), "upstream returned an error status");
            return Err(ExtractionError::UpstreamHttp {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!(from = %url, to = %final_url, "followed redirect");
        }

        let html = response.text().await.map_err(|e| ExtractionError::from_reqwest(e, timeout))?;
        tracing::debug!(%final_url, bytes = html.len(), "fetched page");

        Ok(FetchedPage { final_url, status: status.as_u16(), html })
    }
}
