//! Metadata extraction: page title and canonical URL for the output header.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::dom::{self, sel};

static SEL_TITLE: Lazy<Selector> = sel!("title");
static SEL_LINK: Lazy<Selector> = sel!("link");

/// Cleaned text of the first `<title>` element, or empty.
pub(crate) fn extract_title(doc: &Html) -> String {
    doc.select(&SEL_TITLE)
        .next()
        .map(|el| dom::clean_text(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// The page's canonical URL, falling back to the caller-supplied base URL.
///
/// `rel` is a space-separated token list, so `rel="canonical alternate"`
/// still counts. An empty `href` does not.
pub(crate) fn extract_canonical_url(doc: &Html, base_url: &str) -> String {
    for link in doc.select(&SEL_LINK) {
        let rel_is_canonical = link
            .value()
            .attr("rel")
            .map(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case("canonical")))
            .unwrap_or(false);
        if !rel_is_canonical {
            continue;
        }
        if let Some(href) = link.value().attr("href") {
            if !href.trim().is_empty() {
                return href.trim().to_string();
            }
        }
    }
    base_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_cleaned() {
        let doc = dom::parse("<head><title>  Hello \n  World </title></head>");
        assert_eq!(extract_title(&doc), "Hello World");
    }

    #[test]
    fn missing_title_is_empty() {
        let doc = dom::parse("<p>no head</p>");
        assert_eq!(extract_title(&doc), "");
    }

    #[test]
    fn first_title_wins() {
        let doc = dom::parse("<title>First</title><title>Second</title>");
        assert_eq!(extract_title(&doc), "First");
    }

    #[test]
    fn canonical_link_preferred_over_base() {
        let doc = dom::parse(r#"<head><link rel="canonical" href="https://example.com/page"></head>"#);
        assert_eq!(
            extract_canonical_url(&doc, "https://fallback.test"),
            "https://example.com/page"
        );
    }

    #[test]
    fn multi_token_rel_matches() {
        let doc = dom::parse(r#"<link rel="alternate canonical" href="https://example.com/c">"#);
        assert_eq!(extract_canonical_url(&doc, ""), "https://example.com/c");
    }

    #[test]
    fn empty_href_falls_back_to_base() {
        let doc = dom::parse(r#"<link rel="canonical" href="">"#);
        assert_eq!(
            extract_canonical_url(&doc, "https://fallback.test"),
            "https://fallback.test"
        );
    }

    #[test]
    fn missing_canonical_falls_back_to_base_even_when_empty() {
        let doc = dom::parse("<p>plain</p>");
        assert_eq!(extract_canonical_url(&doc, ""), "");
    }
}
