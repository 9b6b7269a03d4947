//! Link & image resolution: rewrite anchors and images into Markdown syntax.
//!
//! ## Anchor labels and sibling merging
//!
//! Markup frequently splits one visual link across several inline elements —
//! an icon anchor followed by a `<span>` caption, a `<div>` holding the
//! subtitle. Rendering those fragments separately produces a bare `[](url)`
//! next to orphaned caption text, so the resolver merges them: the anchor's
//! own cleaned text, extended with the cleaned text of immediately following
//! text/`span`/`div` siblings, joined with `" | "`. Every consumed sibling
//! goes into an explicit visited set (node ids, not tree markers) so nothing
//! is rendered twice.
//!
//! ## Data and blob URIs
//!
//! `data:`/`blob:` image sources are discarded outright — inlining a
//! base64-encoded screenshot into the Markdown can add megabytes of noise
//! for zero retrievable text.

use std::collections::HashSet;

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use tracing::debug;
use url::Url;

use super::dom::{self, sel};

static SEL_A: Lazy<Selector> = sel!("a");
static SEL_IMG: Lazy<Selector> = sel!("img");

/// Inline containers whose text may extend an anchor label.
const LABEL_SIBLING_TAGS: &[&str] = &["span", "div"];

/// Fallback label for anchors whose merged label is still empty.
const EMPTY_LABEL_FALLBACK: &str = "Link";

/// Rewrite all anchors, then all images, into Markdown text nodes.
pub(crate) fn resolve(doc: &mut Html, base_url: &str) {
    let base = parse_base(base_url);
    resolve_anchors(doc, base.as_ref());
    resolve_images(doc, base.as_ref());
}

enum AnchorAction {
    /// Nested or already-consumed anchor: leave untouched.
    Skip,
    /// No usable href: drop the anchor and its content.
    Discard,
    Replace {
        markdown: String,
        consumed: Vec<NodeId>,
    },
}

fn resolve_anchors(doc: &mut Html, base: Option<&Url>) {
    let anchor_ids = dom::select_ids(doc, &SEL_A);
    let mut consumed: HashSet<NodeId> = HashSet::new();

    for id in anchor_ids {
        if consumed.contains(&id) || !dom::is_attached(&doc.tree, id) {
            continue;
        }

        let action = plan_anchor(doc, id, base, &consumed);
        match action {
            AnchorAction::Skip => {}
            AnchorAction::Discard => dom::detach(doc, id),
            AnchorAction::Replace { markdown, consumed: now } => {
                for sibling in &now {
                    dom::detach(doc, *sibling);
                    consumed.insert(*sibling);
                }
                dom::replace_with_text(doc, id, &markdown);
                consumed.insert(id);
            }
        }
    }
}

/// Decide what to do with one anchor. Pure inspection, no mutation.
fn plan_anchor(
    doc: &Html,
    id: NodeId,
    base: Option<&Url>,
    consumed: &HashSet<NodeId>,
) -> AnchorAction {
    let Some(el) = dom::element(doc, id) else {
        return AnchorAction::Skip;
    };
    let node = *el;

    // Nested anchors are invalid HTML; the outer one wins and the inner is
    // left alone so its text is not emitted twice.
    if dom::has_ancestor_tag(node, "a") {
        return AnchorAction::Skip;
    }

    let href = el.value().attr("href").map(str::trim).unwrap_or("");
    if href.is_empty() {
        return AnchorAction::Discard;
    }

    let mut parts: Vec<String> = Vec::new();
    let own = dom::cleaned_text(node);
    if !own.is_empty() {
        parts.push(own);
    }

    // Walk forward through mergeable siblings, stopping at the first node
    // that is neither text nor an inline container, or was already consumed.
    let mut consumed_now: Vec<NodeId> = Vec::new();
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if consumed.contains(&s.id()) {
            break;
        }
        match s.value() {
            Node::Text(t) => {
                let text = dom::clean_text(&t.text);
                if !text.is_empty() {
                    parts.push(text);
                }
                consumed_now.push(s.id());
            }
            Node::Element(e) if LABEL_SIBLING_TAGS.contains(&e.name()) => {
                let text = dom::cleaned_text(s);
                if !text.is_empty() {
                    parts.push(text);
                }
                consumed_now.push(s.id());
            }
            _ => break,
        }
        sibling = s.next_sibling();
    }

    let label = parts.join(" | ");
    let label = if label.trim().is_empty() {
        EMPTY_LABEL_FALLBACK.to_string()
    } else {
        label
    };

    let href = resolve_href(href, base);
    AnchorAction::Replace {
        markdown: format!("[{label}]({href})"),
        consumed: consumed_now,
    }
}

fn resolve_images(doc: &mut Html, base: Option<&Url>) {
    let image_ids = dom::select_ids(doc, &SEL_IMG);
    let mut image_count = 0usize;

    for id in image_ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let Some(el) = dom::element(doc, id) else {
            continue;
        };

        // Images inside surviving anchors belong to the anchor (only anchors
        // skipped as invalid nesting still exist at this point).
        if dom::has_ancestor_tag(*el, "a") {
            continue;
        }

        let src = el.value().attr("src").map(str::trim).unwrap_or("");
        if src.is_empty() || src.starts_with("blob:") || src.starts_with("data:") {
            debug!("discarding image with unusable src");
            dom::detach(doc, id);
            continue;
        }

        let src = resolve_src(src, base);
        let alt = dom::clean_text(el.value().attr("alt").unwrap_or(""));

        image_count += 1;
        let alt = if alt.is_empty() {
            format!("Image {image_count}")
        } else {
            alt
        };

        dom::replace_with_text(doc, id, &format!("![{alt}]({src})"));
    }
}

/// Parse the caller's base URL, tolerating a missing scheme (`www.…`).
fn parse_base(base_url: &str) -> Option<Url> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(base_url) {
        return Some(url);
    }
    if !base_url.contains("://") {
        if let Ok(url) = Url::parse(&format!("https://{base_url}")) {
            return Some(url);
        }
    }
    None
}

/// Site-relative and fragment hrefs resolve against the base; everything
/// else (absolute, scheme-relative, mailto, javascript) passes through.
fn resolve_href(href: &str, base: Option<&Url>) -> String {
    if href.starts_with('/') && !href.starts_with("//") || href.starts_with('#') {
        if let Some(base) = base {
            if let Ok(resolved) = base.join(href) {
                return resolved.to_string();
            }
        }
    }
    href.to_string()
}

/// An image src resolves whenever it has no network-location component.
/// Protocol-relative (`//cdn…`) and absolute URLs pass through unchanged.
fn resolve_src(src: &str, base: Option<&Url>) -> String {
    if src.starts_with("//") {
        return src.to_string();
    }
    if let Some(base) = base {
        if let Ok(resolved) = base.join(src) {
            return resolved.to_string();
        }
    }
    src.to_string()
}
