//! Noise removal for content candidates.
//!
//! The denylist is plain data. [`NoiseFilter`] joins it into one selector
//! list so a candidate is walked once, however many entries there are.
//!
//! Substring matches such as `[class*="nav"]` are intentionally loose and
//! will also catch legitimate blocks like `navigation-tips`.

use scraper::Selector;

use crate::Result;
use crate::parse::{Fragment, compile_selector};

/// Default denylist, applied as a single combined selector.
pub const NOISE_SELECTORS: &[&str] = &[
    // structural chrome
    "script",
    "style",
    "noscript",
    "iframe",
    "header",
    "footer",
    "nav",
    "aside",
    "form",
    "input",
    "button",
    "select",
    "textarea",
    "fieldset",
    // social, comments, related content
    ".comments",
    "#comments",
    ".comment-list",
    "#respond",
    ".related-posts",
    ".related",
    ".social-share",
    ".share-buttons",
    ".sharedaddy",
    ".author-bio",
    ".newsletter",
    ".subscribe",
    // advertising, sponsors, widgets
    "[class*=\"ad-\"]",
    "[class*=\"ads-\"]",
    "[id*=\"ad-\"]",
    "[class*=\"advert\"]",
    "[id*=\"advert\"]",
    "[class*=\"sponsor\"]",
    "[id*=\"sponsor\"]",
    "[class*=\"promo\"]",
    "[id*=\"promo\"]",
    "[class*=\"widget\"]",
    "[id*=\"widget\"]",
    "[class*=\"banner\"]",
    // hidden content
    "[aria-hidden=\"true\"]",
    ".sr-only",
    ".screen-reader-text",
    ".visually-hidden",
    "[hidden]",
    "[style*=\"display:none\"]",
    "[style*=\"display: none\"]",
    "[style*=\"visibility:hidden\"]",
    "[style*=\"visibility: hidden\"]",
    // consent banners and overlays
    "[id*=\"cookie\"]",
    "[class*=\"cookie\"]",
    "[id*=\"gdpr\"]",
    "[class*=\"gdpr\"]",
    "[id*=\"popup\"]",
    "[class*=\"popup\"]",
    "[id*=\"modal\"]",
    "[class*=\"modal\"]",
    // navigation and menus
    "[id*=\"nav\"]",
    "[class*=\"nav\"]",
    "[id*=\"menu\"]",
    "[class*=\"menu\"]",
];

/// Compiled denylist.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    selector: Selector,
}

impl NoiseFilter {
    /// Compiles a denylist into one selector list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExtractionError::Internal`] if any entry is not a
    /// valid CSS selector.
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Result<Self> {
        let combined = selectors.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
        Ok(Self { selector: compile_selector(&combined)? })
    }

    /// Removes every matching descendant from `fragment`.
    pub fn strip(&self, fragment: &mut Fragment) -> usize {
        fragment.remove_matching(&self.selector)
    }
}
