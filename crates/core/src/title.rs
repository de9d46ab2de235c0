//! Title extraction and site-name cleanup.
//!
//! Cleanup is cosmetic and best-effort: it can leave a site name in place
//! when the naming does not follow the hostname, and it can strip a word that
//! merely happens to equal the first hostname label.

use regex::{Regex, RegexBuilder};
use url::Url;

use crate::parse::{Document, collapse_spaces};

/// Title used when the page offers none.
pub const UNTITLED: &str = "Untitled Post";

const SEPARATORS: &str = r"[|\-–—:]";

/// Sources tried in order; the first non-empty one wins.
const TITLE_SELECTORS: &[&str] = &["h1", ".post-title", ".entry-title"];

/// Extracts the raw page title.
///
/// Priority:
/// 1. `og:title` meta
/// 2. `twitter:title` meta
/// 3. `<title>` element
/// 4. First `<h1>`
/// 5. First `.post-title`, then `.entry-title`
pub fn extract_title(doc: &Document) -> Option<String> {
    if let Some(title) = doc.meta_content("og:title") {
        return Some(collapse_spaces(&title));
    }

    if let Some(title) = doc.meta_content("twitter:title") {
        return Some(collapse_spaces(&title));
    }

    if let Some(title) = doc.title() {
        return Some(title);
    }

    TITLE_SELECTORS.iter().find_map(|selector| doc.first_text(selector))
}

/// Site-name fragments derived from a hostname.
///
/// `www.myblog.wordpress.com` yields `myblog.wordpress.com` and `myblog`.
pub fn site_names(url: &Url) -> Vec<String> {
    let Some(host) = url.host_str() else {
        return Vec::new();
    };

    let host = host.strip_prefix("www.").unwrap_or(host).to_lowercase();
    let mut names = vec![host.clone()];

    if let Some(label) = host.split('.').next()
        && !label.is_empty()
        && label != host
    {
        names.push(label.to_string());
    }

    names
}

/// Strips a leading or trailing site name next to a separator character.
///
/// Every pattern for every site name is applied, then stray separators at
/// either edge are trimmed. When cleanup would leave nothing the original
/// title is returned.
pub fn clean_title(title: &str, url: &Url) -> String {
    let mut cleaned = title.to_string();

    for name in site_names(url) {
        let name = regex::escape(&name);
        let patterns = [
            format!(r"^\s*{name}\s*{SEPARATORS}+\s*"),
            format!(r"\s*{SEPARATORS}+\s*{name}\s*$"),
        ];

        for pattern in patterns {
            if let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
        }
    }

    if let Ok(edges) = Regex::new(r"^[\s|\-–—:]+|[\s|\-–—:]+$") {
        cleaned = edges.replace_all(&cleaned, "").into_owned();
    }

    if cleaned.is_empty() { title.trim().to_string() } else { cleaned }
}

/// Extracts the title, optionally cleans it, and falls back to
/// `fallback` when nothing is found.
pub fn resolve_title(doc: &Document, base_url: Option<&Url>, clean: bool, fallback: &str) -> String {
    let Some(title) = extract_title(doc) else {
        tracing::debug!("no title source found, using fallback");
        return fallback.to_string();
    };

    match base_url {
        Some(url) if clean => clean_title(&title, url),
        _ => title,
    }
}
