//! Main extraction API.
//!
//! The pipeline is a straight line:
//!
//! `validate → fetch → parse → title → content candidate → images → thumbnail → normalize`
//!
//! Only validation and fetching can fail. Once a page is in hand every later
//! stage degrades to a fallback value instead of erroring, so a fetched page
//! always yields a usable result.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrivener_core::Extractor;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::new()?;
//! let result = extractor.extract("https://example.com/blog/post").await?;
//! println!("{} ({:?})", result.title, result.thumbnail_url);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::extract::{CompiledRules, ExtractConfig, normalize_content, select_content};
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher, validate_url};
use crate::parse::Document;
use crate::thumbnail::resolve_thumbnail;
use crate::title::resolve_title;
use crate::{ExtractionError, Result};

/// A successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Page title with the site name stripped, or the fallback title.
    pub title: String,
    /// Cleaned article body HTML, or the placeholder paragraph.
    #[serde(rename = "content")]
    pub content_html: String,
    /// Absolute URL of a representative image.
    pub thumbnail_url: Option<String>,
}

/// Combined fetch and extraction settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use scrivener_core::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .timeout(Duration::from_secs(5))
///     .min_content_length(300)
///     .build();
/// assert_eq!(config.extract.min_content_length, 300);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
}

impl ExtractorConfig {
    /// Creates a new builder for ExtractorConfig.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }
}

/// Builder for ExtractorConfig.
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Sets the fetch timeout.
    pub fn timeout(mut self, value: Duration) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the candidate acceptance threshold in characters.
    pub fn min_content_length(mut self, value: usize) -> Self {
        self.config.extract.min_content_length = value;
        self
    }

    /// Sets the spacer image threshold in pixels.
    pub fn min_image_dimension(mut self, value: u32) -> Self {
        self.config.extract.min_image_dimension = value;
        self
    }

    /// Replaces the candidate container selectors.
    pub fn content_selectors<S: Into<String>>(mut self, selectors: impl IntoIterator<Item = S>) -> Self {
        self.config.extract.content_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Appends selectors to the noise denylist.
    pub fn extra_noise_selectors<S: Into<String>>(mut self, selectors: impl IntoIterator<Item = S>) -> Self {
        self.config.extract.noise_selectors.extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Sets whether site names are stripped from titles.
    pub fn clean_title(mut self, value: bool) -> Self {
        self.config.extract.clean_title = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for content extraction.
///
/// Holds only immutable state, so one instance can serve any number of
/// concurrent calls. Every call parses its own document.
pub struct Extractor<F = HttpFetcher> {
    fetcher: F,
    config: ExtractConfig,
    rules: CompiledRules,
}

impl Extractor<HttpFetcher> {
    /// Creates an extractor with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Creates an extractor backed by reqwest with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Internal`] if a configured selector is
    /// invalid or the HTTP client cannot be built.
    pub fn with_config(config: ExtractorConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch)?;
        Self::with_fetcher(fetcher, config.extract)
    }
}

impl<F: Fetcher> Extractor<F> {
    /// Creates an extractor with a custom [`Fetcher`].
    pub fn with_fetcher(fetcher: F, config: ExtractConfig) -> Result<Self> {
        let rules = CompiledRules::compile(&config)?;
        Ok(Self { fetcher, config, rules })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Validates `url`, fetches it once and extracts the post.
    ///
    /// Dropping the returned future aborts the in-flight request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` before any network access for bad input, and
    /// `Timeout`, `NetworkUnreachable` or `UpstreamHttp` for fetch failures.
    #[tracing::instrument(name = "extract", skip(self, url), fields(url = %url))]
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult> {
        let url = validate_url(url)?;
        let page = self.fetcher.fetch(&url).await?;
        Ok(self.extract_html(&page.html, Some(&page.final_url)))
    }

    /// Like [`Extractor::extract`], but stops as soon as `token` is
    /// cancelled. No stage runs after cancellation.
    #[tracing::instrument(name = "extract", skip(self, url, token), fields(url = %url))]
    pub async fn extract_with_cancel(&self, url: &str, token: &CancellationToken) -> Result<ExtractionResult> {
        let url = validate_url(url)?;

        let page = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!("extraction cancelled during fetch");
                return Err(ExtractionError::internal("extraction cancelled"));
            }
            page = self.fetcher.fetch(&url) => page?,
        };

        if token.is_cancelled() {
            return Err(ExtractionError::internal("extraction cancelled"));
        }

        Ok(self.extract_html(&page.html, Some(&page.final_url)))
    }

    /// Runs the heuristic stages on already fetched HTML.
    ///
    /// `base_url` is the URL the page was served from; without it relative
    /// image sources are left as they are and site names are not stripped.
    pub fn extract_html(&self, html: &str, base_url: Option<&Url>) -> ExtractionResult {
        run_stages(html, base_url, &self.config, &self.rules)
    }
}

fn run_stages(html: &str, base_url: Option<&Url>, config: &ExtractConfig, rules: &CompiledRules) -> ExtractionResult {
    let doc = Document::parse(html);

    let title = resolve_title(&doc, base_url, config.clean_title, &config.fallback_title);
    let extracted = select_content(&doc, base_url, rules, config);
    let thumbnail_url = resolve_thumbnail(&doc, base_url, config.min_image_dimension);
    let content_html = normalize_content(&extracted.content, &config.fallback_content);

    tracing::info!(
        title = %title,
        selector = extracted.selector.as_deref().unwrap_or("body"),
        text_length = extracted.text_length,
        thumbnail = thumbnail_url.is_some(),
        "extracted post"
    );

    ExtractionResult { title, content_html, thumbnail_url }
}

/// Extracts a post from HTML with the default configuration.
///
/// # Example
///
/// ```rust
/// use scrivener_core::extract_from_html;
/// use url::Url;
///
/// let html = format!(
///     r#"<html><head><meta property="og:title" content="Real Title"></head><body><article><p>{}</p></article></body></html>"#,
///     "x".repeat(250)
/// );
/// let base = Url::parse("https://news.example/a").unwrap();
/// let result = extract_from_html(&html, Some(&base)).unwrap();
/// assert_eq!(result.title, "Real Title");
/// assert_eq!(result.thumbnail_url, None);
/// ```
pub fn extract_from_html(html: &str, base_url: Option<&Url>) -> Result<ExtractionResult> {
    let config = ExtractConfig::default();
    let rules = CompiledRules::compile(&config)?;
    Ok(run_stages(html, base_url, &config, &rules))
}
