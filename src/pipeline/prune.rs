//! Structural pruning: drop non-content subtrees before any serialisation.
//!
//! Two phases, in a fixed order. First the unconditional removals — tags that
//! never carry readable content (`script`, `style`, head metadata, frames,
//! the already-extracted `<title>`, explicit `<br>`) plus comment nodes.
//! Then the flag-driven removals (images, anchors, header/footer regions),
//! so the link and image resolver downstream never has to special-case an
//! excluded category: by the time it runs, excluded elements simply do not
//! exist.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};

use super::dom::{self, sel};
use crate::config::ConversionConfig;

static SEL_BOILERPLATE: Lazy<Selector> =
    sel!("script, style, meta, link, noscript, iframe, title, br");
static SEL_IMG: Lazy<Selector> = sel!("img");
static SEL_A: Lazy<Selector> = sel!("a");
static SEL_HEADER: Lazy<Selector> = sel!("header");
static SEL_FOOTER: Lazy<Selector> = sel!("footer");

/// Remove the tags that never contribute visible content, plus comments.
pub(crate) fn remove_boilerplate(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_BOILERPLATE);
    for id in ids {
        dom::detach(doc, id);
    }

    let comment_ids: Vec<NodeId> = doc
        .tree
        .root()
        .descendants()
        .filter(|n| matches!(n.value(), Node::Comment(_)))
        .map(|n| n.id())
        .collect();
    for id in comment_ids {
        dom::detach(doc, id);
    }
}

/// Remove whole element categories the request excluded.
pub(crate) fn apply_flags(doc: &mut Html, config: &ConversionConfig) {
    let mut excluded: Vec<&Lazy<Selector>> = Vec::new();
    if !config.include_images {
        excluded.push(&SEL_IMG);
    }
    if !config.include_links {
        excluded.push(&SEL_A);
    }
    if !config.include_headers {
        excluded.push(&SEL_HEADER);
    }
    if !config.include_footers {
        excluded.push(&SEL_FOOTER);
    }
    for selector in excluded {
        let ids = dom::select_ids(doc, selector);
        for id in ids {
            dom::detach(doc, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConversionConfig {
        ConversionConfig::default()
    }

    #[test]
    fn scripts_styles_and_comments_removed() {
        let mut doc = dom::parse(
            "<head><title>T</title><style>p{}</style></head>\
             <body><script>var x;</script><!-- hidden note --><p>keep</p></body>",
        );
        remove_boilerplate(&mut doc);
        let text = dom::cleaned_text(doc.tree.root());
        assert_eq!(text, "keep");
    }

    #[test]
    fn line_breaks_removed() {
        let mut doc = dom::parse("<p>a<br>b</p>");
        remove_boilerplate(&mut doc);
        assert_eq!(doc.select(&Selector::parse("br").unwrap()).count(), 0);
    }

    #[test]
    fn images_removed_when_excluded() {
        let mut doc = dom::parse(r#"<p><img src="/x.png" alt="pic">text</p>"#);
        let cfg = config(); // include_images defaults to false
        apply_flags(&mut doc, &cfg);
        assert_eq!(doc.select(&SEL_IMG).count(), 0);
        assert_eq!(dom::cleaned_text(doc.tree.root()), "text");
    }

    #[test]
    fn anchors_kept_by_default_removed_on_request() {
        let html = r#"<a href="/x">go</a>"#;

        let mut doc = dom::parse(html);
        apply_flags(&mut doc, &config());
        assert_eq!(doc.select(&SEL_A).count(), 1);

        let mut doc = dom::parse(html);
        let cfg = ConversionConfig::builder()
            .include_links(false)
            .build()
            .unwrap();
        apply_flags(&mut doc, &cfg);
        assert_eq!(doc.select(&SEL_A).count(), 0);
    }

    #[test]
    fn header_footer_regions_removed_on_request() {
        let html = "<header>nav</header><main>body</main><footer>legal</footer>";
        let mut doc = dom::parse(html);
        let cfg = ConversionConfig::builder()
            .include_headers(false)
            .include_footers(false)
            .build()
            .unwrap();
        apply_flags(&mut doc, &cfg);
        assert_eq!(dom::cleaned_text(doc.tree.root()), "body");
    }
}
