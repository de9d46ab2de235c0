//! Content candidate selection and output normalization.
//!
//! Each candidate container is cloned into a [`Fragment`], cleaned, and
//! measured. The first one with enough text wins; otherwise the body is used.

use scraper::Selector;
use url::Url;

use crate::Result;
use crate::images::{MIN_IMAGE_DIMENSION, resolve_images};
use crate::noise::{NOISE_SELECTORS, NoiseFilter};
use crate::parse::{Document, Element, Fragment, compile_selector};

/// Content container selectors, most specific first.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article .post-content",
    "article .entry-content",
    "article .article-content",
    "article .post-body",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".article-body",
    ".post-body",
    "[itemprop=\"articleBody\"]",
    ".story-body",
    "article",
    "[role=\"main\"]",
    "main",
    "#content",
    ".content",
    "#main",
];

/// Placeholder returned when nothing could be extracted.
pub const PLACEHOLDER_CONTENT: &str = "<p>Content could not be extracted from this page.</p>";

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Candidate container selectors, tried in order.
    pub content_selectors: Vec<String>,
    /// Denylist applied to every candidate.
    pub noise_selectors: Vec<String>,
    /// A candidate is accepted once its cleaned text is longer than this.
    pub min_content_length: usize,
    /// Images with an explicit dimension below this are dropped.
    pub min_image_dimension: u32,
    /// Maximum passes for removing empty blocks.
    pub max_empty_node_passes: usize,
    /// Whether to strip the site name from the title.
    pub clean_title: bool,
    /// Title used when the page has none.
    pub fallback_title: String,
    /// Content used when extraction yields nothing.
    pub fallback_content: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            content_selectors: CONTENT_SELECTORS.iter().map(ToString::to_string).collect(),
            noise_selectors: NOISE_SELECTORS.iter().map(ToString::to_string).collect(),
            min_content_length: 200,
            min_image_dimension: MIN_IMAGE_DIMENSION,
            max_empty_node_passes: 10,
            clean_title: true,
            fallback_title: crate::title::UNTITLED.to_string(),
            fallback_content: PLACEHOLDER_CONTENT.to_string(),
        }
    }
}

/// Selector tables compiled once and shared read-only between calls.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    content: Vec<(String, Selector)>,
    noise: NoiseFilter,
}

impl CompiledRules {
    /// Compiles the selector tables of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExtractionError::Internal`] naming the first invalid
    /// selector.
    pub fn compile(config: &ExtractConfig) -> Result<Self> {
        let content = config
            .content_selectors
            .iter()
            .map(|s| compile_selector(s).map(|sel| (s.clone(), sel)))
            .collect::<Result<Vec<_>>>()?;
        let noise = NoiseFilter::new(&config.noise_selectors)?;

        Ok(Self { content, noise })
    }
}

/// The result of content extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Cleaned inner HTML of the chosen container.
    pub content: String,
    /// Selector that produced the content, `None` for the body fallback.
    pub selector: Option<String>,
    /// Characters of plain text in the content.
    pub text_length: usize,
}

/// Clones a candidate's children and cleans the copy: noise removal, image
/// resolution, empty block removal.
///
/// Returns the cleaned markup and its plain-text length.
fn clean_candidate(
    element: &Element<'_>, base: Option<&Url>, rules: &CompiledRules, config: &ExtractConfig,
) -> (String, usize) {
    let mut fragment = Fragment::parse(&element.inner_html());
    let removed = rules.noise.strip(&mut fragment);

    let html = resolve_images(&fragment.inner_html(), base, config.min_image_dimension);

    let mut fragment = Fragment::parse(&html);
    let empty = fragment.remove_empty_blocks(config.max_empty_node_passes);
    tracing::trace!(noise = removed, empty, "cleaned candidate");

    (fragment.inner_html(), fragment.text_len())
}

/// Walks the candidate selectors and returns the first cleaned container
/// whose text is longer than the threshold, falling back to the whole body.
pub fn select_content(
    doc: &Document, base: Option<&Url>, rules: &CompiledRules, config: &ExtractConfig,
) -> ExtractedContent {
    for (raw, selector) in &rules.content {
        let Some(element) = doc.select_first(selector) else {
            continue;
        };

        let (html, text_length) = clean_candidate(&element, base, rules, config);
        if text_length > config.min_content_length {
            tracing::debug!(selector = %raw, text_length, "accepted content candidate");
            return ExtractedContent { content: html, selector: Some(raw.clone()), text_length };
        }
        tracing::debug!(selector = %raw, text_length, "candidate below threshold");
    }

    let (content, text_length) = match doc.body() {
        Some(body) => clean_candidate(&body, base, rules, config),
        None => (String::new(), 0),
    };
    tracing::debug!(text_length, "falling back to document body");

    ExtractedContent { content, selector: None, text_length }
}

/// Drops whitespace-only lines so runs of blank lines disappear.
pub fn collapse_blank_lines(html: &str) -> String {
    html.lines().filter(|line| !line.trim().is_empty()).collect::<Vec<_>>().join("\n")
}

/// Final content normalization; substitutes `fallback` for empty output.
pub fn normalize_content(html: &str, fallback: &str) -> String {
    let collapsed = collapse_blank_lines(html);
    let trimmed = collapsed.trim();
    if trimmed.is_empty() { fallback.to_string() } else { trimmed.to_string() }
}
