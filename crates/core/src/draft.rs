//! Post drafts built from extraction results.
//!
//! A draft is what the authoring form is pre-filled with. The thumbnail is
//! kept as the remote URL; copying it into local storage is left to the
//! author.

use serde::Serialize;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use crate::ExtractionResult;

const MAX_SLUG_LEN: usize = 80;
const UNTITLED_SLUG: &str = "untitled-post";

/// An unsaved post pre-filled from an imported page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub thumbnail_url: Option<String>,
    pub source_url: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub imported_at: OffsetDateTime,
}

impl PostDraft {
    /// Builds a draft from an extraction of `source_url`.
    pub fn from_extraction(result: ExtractionResult, source_url: &Url) -> Self {
        let slug = slugify(&result.title);

        Self {
            id: Uuid::new_v4(),
            title: result.title,
            slug,
            content: result.content_html,
            thumbnail_url: result.thumbnail_url,
            source_url: source_url.to_string(),
            tags: Vec::new(),
            imported_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Lowercase ASCII slug: alphanumeric runs joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());

    for word in title.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty()) {
        let sep = usize::from(!slug.is_empty());
        if slug.len() + sep + word.len() > MAX_SLUG_LEN {
            break;
        }
        if sep == 1 {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }

    if slug.is_empty() { UNTITLED_SLUG.to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024 -- what's new? "), "rust-2024-what-s-new");
        assert_eq!(slugify("日本語"), "untitled-post");
        assert_eq!(slugify(""), "untitled-post");
    }

    #[test]
    fn test_slugify_length_cap() {
        let slug = slugify(&"word ".repeat(40));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_from_extraction() {
        let result = ExtractionResult {
            title: "Real Title".into(),
            content_html: "<p>Body</p>".into(),
            thumbnail_url: Some("https://news.example/a.png".into()),
        };
        let source = Url::parse("https://news.example/a").unwrap();
        let draft = PostDraft::from_extraction(result, &source);

        assert_eq!(draft.slug, "real-title");
        assert_eq!(draft.content, "<p>Body</p>");
        assert_eq!(draft.thumbnail_url.as_deref(), Some("https://news.example/a.png"));
        assert_eq!(draft.source_url, "https://news.example/a");
        assert!(draft.tags.is_empty());

        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("importedAt").and_then(|v| v.as_str()).is_some());
        assert!(json.get("thumbnailUrl").is_some());
    }
}
