//! Image URL resolution and spacer filtering.

use url::Url;

/// Images with an explicit width or height below this are treated as
/// spacers or icons.
pub const MIN_IMAGE_DIMENSION: u32 = 50;

/// Resolves an image source against `base`.
///
/// Sources that already start with `http` and `data:` URIs are returned
/// unchanged. Returns `None` when the source is blank or cannot be resolved.
pub fn resolve_src(src: &str, base: Option<&Url>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    if is_absolute(src) {
        return Some(src.to_string());
    }

    base?.join(src).ok().map(String::from)
}

fn is_absolute(src: &str) -> bool {
    let lower = src.get(..5).unwrap_or(src).to_ascii_lowercase();
    lower.starts_with("http") || lower.starts_with("data:")
}

/// Parses the leading integer of a dimension attribute (`"20"`, `"20px"`).
fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// True when an explicit `width` or `height` is below `min`.
///
/// Images without dimension attributes are never considered undersized.
pub fn is_undersized(width: Option<&str>, height: Option<&str>, min: u32) -> bool {
    [width, height].into_iter().flatten().filter_map(leading_number).any(|v| v < min)
}

/// Rewrites every `<img>` in `html`: relative sources become absolute and
/// undersized images are dropped.
///
/// An image whose source cannot be resolved keeps its original `src`.
pub fn resolve_images(html: &str, base: Option<&Url>, min_dimension: u32) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("img", |el| {
                if is_undersized(
                    el.get_attribute("width").as_deref(),
                    el.get_attribute("height").as_deref(),
                    min_dimension,
                ) {
                    el.remove();
                    return Ok(());
                }

                if let Some(src) = el.get_attribute("src")
                    && !is_absolute(src.trim())
                    && let Some(absolute) = resolve_src(&src, base)
                {
                    el.set_attribute("src", &absolute)?;
                }
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    let written = rewriter.write(html.as_bytes()).and_then(|()| rewriter.end());
    if written.is_err() {
        tracing::debug!("image rewrite failed, keeping markup unchanged");
        return html.to_string();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_resolve_src() {
        let base = base();
        assert_eq!(resolve_src("/img/a.png", Some(&base)), Some("https://example.com/img/a.png".to_string()));
        assert_eq!(resolve_src("a.png", Some(&base)), Some("https://example.com/blog/a.png".to_string()));
        assert_eq!(resolve_src("//cdn.example.net/a.png", Some(&base)), Some("https://cdn.example.net/a.png".to_string()));
        assert_eq!(resolve_src("https://other.org/x.jpg", None), Some("https://other.org/x.jpg".to_string()));
        assert_eq!(resolve_src("data:image/png;base64,AAAA", None), Some("data:image/png;base64,AAAA".to_string()));
        assert_eq!(resolve_src("/img/a.png", None), None);
        assert_eq!(resolve_src("   ", Some(&base)), None);
    }

    #[test]
    fn test_is_undersized() {
        assert!(is_undersized(Some("20"), Some("20"), 50));
        assert!(is_undersized(Some("300"), Some("1"), 50));
        assert!(is_undersized(Some("49px"), None, 50));
        assert!(!is_undersized(Some("50"), Some("50"), 50));
        assert!(!is_undersized(None, None, 50));
        assert!(!is_undersized(Some("auto"), None, 50));
    }

    #[test]
    fn test_resolve_images_rewrites_relative_sources() {
        let base = base();
        let html = resolve_images(r#"<p><img src="/img/a.png" alt="a"></p>"#, Some(&base), MIN_IMAGE_DIMENSION);
        assert!(html.contains(r#"src="https://example.com/img/a.png""#));
    }

    #[test]
    fn test_resolve_images_drops_spacers() {
        let html = resolve_images(
            r#"<img src="/pixel.gif" width="20" height="20"><img src="/photo.jpg">"#,
            Some(&base()),
            MIN_IMAGE_DIMENSION,
        );
        assert!(!html.contains("pixel.gif"));
        assert!(html.contains("https://example.com/photo.jpg"));
    }

    #[test]
    fn test_resolve_images_keeps_unresolvable_source() {
        let html = resolve_images(r#"<img src="relative.png">"#, None, MIN_IMAGE_DIMENSION);
        assert!(html.contains(r#"src="relative.png""#));
    }

    #[test]
    fn test_resolve_images_leaves_data_uris() {
        let html = resolve_images(r#"<img src="data:image/gif;base64,R0lG">"#, Some(&base()), MIN_IMAGE_DIMENSION);
        assert!(html.contains("data:image/gif;base64,R0lG"));
    }
}
