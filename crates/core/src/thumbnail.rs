//! Representative image detection.

use url::Url;

use crate::images::{is_undersized, resolve_src};
use crate::parse::{Document, compile_selector};

/// Containers searched for a first image, in priority order, after the
/// `og:image` and `twitter:image` meta tags.
pub const THUMBNAIL_CONTAINERS: &[&str] = &["article", ".featured-image", "#content"];

/// Finds the page's representative image as an absolute URL.
///
/// A candidate that cannot be resolved is treated as absent rather than as
/// an error. Images inside containers are subject to the spacer filter.
pub fn resolve_thumbnail(doc: &Document, base: Option<&Url>, min_dimension: u32) -> Option<String> {
    for key in ["og:image", "twitter:image"] {
        if let Some(src) = doc.meta_content(key) {
            let resolved = resolve_src(&src, base);
            tracing::debug!(source = key, resolved = resolved.is_some(), "thumbnail from meta");
            return resolved;
        }
    }

    let img = compile_selector("img[src]").ok()?;

    for container in THUMBNAIL_CONTAINERS {
        let Some(element) = doc.first(container).ok().flatten() else {
            continue;
        };

        let first = element
            .select(&img)
            .into_iter()
            .find(|el| !is_undersized(el.attr("width"), el.attr("height"), min_dimension));

        if let Some(src) = first.and_then(|el| el.attr("src")) {
            let resolved = resolve_src(src, base);
            tracing::debug!(source = container, resolved = resolved.is_some(), "thumbnail from container");
            return resolved;
        }
    }

    None
}
