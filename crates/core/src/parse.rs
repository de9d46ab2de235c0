//! HTML parsing and DOM manipulation.
//!
//! [`Document`] wraps a fully parsed page and is read-only. Anything that
//! needs mutation works on a [`Fragment`]: an independent parse of one
//! element's markup, so changes never leak back into the document or into
//! the next candidate that is tried.
//!
//! # Example
//!
//! ```rust
//! use scrivener_core::parse::{Document, Fragment};
//! use scraper::Selector;
//!
//! let doc = Document::parse("<html><body><article><p>Hi</p><script>x()</script></article></body></html>");
//! let article = doc.first("article").unwrap().unwrap();
//!
//! let mut fragment = Fragment::parse(&article.inner_html());
//! fragment.remove_matching(&Selector::parse("script").unwrap());
//! assert_eq!(fragment.inner_html(), "<p>Hi</p>");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{ExtractionError, Result};

/// Compiles a CSS selector, reporting failures as internal errors.
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractionError::Internal {
        message: format!("invalid selector `{selector}`"),
        details: Some(e.to_string()),
    })
}

/// Represents a parsed HTML document.
///
/// Each extraction parses its own document; nothing is shared between calls.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML the way browsers do, tolerating malformed markup.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Internal`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// First element in document order matching `selector`.
    pub fn first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.select_first(&sel))
    }

    /// First element matching an already compiled selector.
    pub fn select_first(&'_ self, selector: &Selector) -> Option<Element<'_>> {
        self.html.select(selector).next().map(|el| Element { element: el })
    }

    /// The `<body>` element, if the parser produced one.
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.first("body").ok().flatten()
    }

    /// Gets the text of the `<title>` element in `<head>`, trimmed.
    ///
    /// `<title>` children of inline SVG are not document titles.
    pub fn title(&self) -> Option<String> {
        self.first_text("head > title")
    }

    /// Trimmed text of the first element matching `selector`, if non-empty.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let element = self.first(selector).ok().flatten()?;
        let text = collapse_spaces(&element.text());
        if text.is_empty() { None } else { Some(text) }
    }

    /// Content of a `<meta>` tag addressed by `property` or `name`.
    ///
    /// `property` wins when both forms are present, matching how Open Graph
    /// and Twitter card tags are usually written.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        for attr in ["property", "name"] {
            let selector = format!("meta[{attr}=\"{key}\"]");
            if let Ok(elements) = self.select(&selector) {
                for el in elements {
                    if let Some(content) = el.attr("content") {
                        let content = content.trim();
                        if !content.is_empty() {
                            return Some(content.to_string());
                        }
                    }
                }
            }
        }

        None
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// A read-only handle on an element of a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Descendants matching a compiled selector, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.element.select(selector).map(|el| Element { element: el }).collect()
    }
}

/// A mutable copy of an element's children.
///
/// Built from serialized markup, so it never aliases the document it came
/// from.
pub struct Fragment {
    html: Html,
}

impl Fragment {
    /// Parses an HTML fragment in body context.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Detaches every element matching `selector` and returns how many
    /// subtrees were removed.
    ///
    /// Matches nested inside an already removed subtree are counted too.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let root = self.html.root_element().id();
        let ids: Vec<_> = self.html.select(selector).map(|el| el.id()).filter(|id| *id != root).collect();

        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }

    /// Removes `<p>`, `<div>` and `<span>` elements with no text, no element
    /// children and no `background-image` style.
    ///
    /// Runs up to `max_passes` times since removing an empty child can leave
    /// its parent empty.
    pub fn remove_empty_blocks(&mut self, max_passes: usize) -> usize {
        let Ok(selector) = compile_selector("p, div, span") else {
            return 0;
        };

        let mut removed = 0;
        for _ in 0..max_passes.max(1) {
            let ids: Vec<_> = self.html.select(&selector).filter(is_empty_block).map(|el| el.id()).collect();

            if ids.is_empty() {
                break;
            }
            for id in ids {
                if let Some(mut node) = self.html.tree.get_mut(id) {
                    node.detach();
                    removed += 1;
                }
            }
        }

        removed
    }

    /// Plain text of the fragment.
    pub fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Length in characters of the trimmed plain text.
    pub fn text_len(&self) -> usize {
        self.text().trim().chars().count()
    }

    /// Serialized markup of the fragment's top-level nodes.
    pub fn inner_html(&self) -> String {
        self.html.root_element().inner_html()
    }
}

fn is_empty_block(el: &ElementRef<'_>) -> bool {
    if el.text().any(|t| !t.trim().is_empty()) {
        return false;
    }
    if el.children().any(|child| child.value().is_element()) {
        return false;
    }
    !el.value().attr("style").is_some_and(|style| style.to_ascii_lowercase().contains("background-image"))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <meta property="og:title" content="  OG Title ">
            <meta name="twitter:title" content="">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_title_ignores_svg_title() {
        let doc = Document::parse(
            r#"<html><head></head><body><svg><title>Search icon</title></svg><h1>Real Heading</h1></body></html>"#,
        );
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let link = doc.first("a").unwrap().unwrap();

        assert_eq!(link.attr("href"), Some("https://example.com"));
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ExtractionError::Internal { .. })));
    }

    #[test]
    fn test_meta_content_trims_and_skips_empty() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.meta_content("og:title"), Some("OG Title".to_string()));
        assert_eq!(doc.meta_content("twitter:title"), None);
        assert_eq!(doc.meta_content("og:image"), None);
    }

    #[test]
    fn test_fragment_remove_matching() {
        let mut fragment = Fragment::parse("<p>Keep</p><nav><p>Drop</p></nav><script>x()</script>");
        let removed = fragment.remove_matching(&compile_selector("nav, script").unwrap());

        assert_eq!(removed, 2);
        assert_eq!(fragment.inner_html(), "<p>Keep</p>");
    }

    #[test]
    fn test_fragment_is_independent_of_document() {
        let doc = Document::parse("<html><body><article><p>a</p><aside>b</aside></article></body></html>");
        let article = doc.first("article").unwrap().unwrap();

        let mut fragment = Fragment::parse(&article.inner_html());
        fragment.remove_matching(&compile_selector("aside").unwrap());

        assert!(!fragment.inner_html().contains("aside"));
        assert!(doc.first("article").unwrap().unwrap().inner_html().contains("<aside>"));
    }

    #[test]
    fn test_remove_empty_blocks() {
        let mut fragment = Fragment::parse(
            r#"<div><p> </p><span></span></div><p>text</p><div style="background-image:url(a.png)"></div><p><img src="a.png"></p>"#,
        );
        fragment.remove_empty_blocks(10);
        let html = fragment.inner_html();

        assert!(!html.contains("<span>"));
        assert!(html.contains("<p>text</p>"));
        assert!(html.contains("background-image"));
        assert!(html.contains("<img"));
        assert_eq!(html.matches("<div").count(), 1);
    }

    #[test]
    fn test_text_len_counts_chars() {
        let fragment = Fragment::parse("<p>  héllo  </p>");
        assert_eq!(fragment.text_len(), 5);
    }
}
