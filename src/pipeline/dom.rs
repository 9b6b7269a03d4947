//! Document tree loading and shared tree-surgery helpers.
//!
//! ## Why an arena tree?
//!
//! Every later stage rewrites the document in place: elements are detached,
//! replaced by pre-rendered Markdown text nodes, or have their children
//! swapped out. `scraper::Html` stores nodes in an `ego_tree` arena addressed
//! by `NodeId`, which makes each of those rewrites an O(1) re-link — and lets
//! stages collect the ids they want to touch with an immutable traversal
//! first, then mutate, without fighting the borrow checker.
//!
//! Parsing is html5ever underneath and therefore permissive: unclosed tags,
//! stray closers, and mis-nesting all recover into *some* tree. The only
//! input the pipeline cannot handle is one that is not text, and that is
//! rejected before parsing ever happens (see [`crate::fetch`]).

use ego_tree::{NodeId, Tree};
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

/// Compile a CSS selector at first use.
///
/// Selector strings are hardcoded, so a parse failure is a programmer error.
macro_rules! sel {
    ($s:expr) => {
        once_cell::sync::Lazy::new(|| {
            scraper::Selector::parse($s).expect(concat!("bad selector: ", $s))
        })
    };
}
pub(crate) use sel;

/// Parse HTML text into a mutable document tree.
///
/// Never fails: html5ever recovers from malformed markup best-effort.
pub(crate) fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

/// Collapse all whitespace runs to single spaces and trim the ends.
///
/// This is the "cleaned text" rule every extracted string goes through.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Raw concatenation of every text node in the subtree rooted at `node`
/// (including `node` itself when it is a text node). No normalisation.
pub(crate) fn raw_text(node: ego_tree::NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if let Node::Text(t) = descendant.value() {
            out.push_str(&t.text);
        }
    }
    out
}

/// Cleaned text of the subtree rooted at `node`.
pub(crate) fn cleaned_text(node: ego_tree::NodeRef<'_, Node>) -> String {
    clean_text(&raw_text(node))
}

/// Whether the node is still reachable from the document root.
///
/// Detached subtrees keep their arena slots (ids stay valid), so stages that
/// collected ids up front must re-check before touching each one.
pub(crate) fn is_attached(tree: &Tree<Node>, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current.id() == tree.root().id()
}

/// Detach the node (and its subtree) from the document.
pub(crate) fn detach(doc: &mut Html, id: NodeId) {
    if let Some(mut node) = doc.tree.get_mut(id) {
        node.detach();
    }
}

/// Replace a node with a single text node holding `text`.
///
/// An empty replacement just removes the node — inserting empty text nodes
/// only creates blank lines for the flattener to scrub back out.
pub(crate) fn replace_with_text(doc: &mut Html, id: NodeId, text: &str) {
    let has_parent = doc
        .tree
        .get(id)
        .map(|n| n.parent().is_some())
        .unwrap_or(false);
    if !has_parent {
        return;
    }
    if text.is_empty() {
        detach(doc, id);
        return;
    }
    if let Some(mut node) = doc.tree.get_mut(id) {
        node.insert_before(Node::Text(Text { text: text.into() }));
        node.detach();
    }
}

/// Replace the node's children with a single text node holding `text`.
pub(crate) fn set_text_content(doc: &mut Html, id: NodeId, text: &str) {
    let child_ids: Vec<NodeId> = match doc.tree.get(id) {
        Some(node) => node.children().map(|c| c.id()).collect(),
        None => return,
    };
    for child in child_ids {
        detach(doc, child);
    }
    if let Some(mut node) = doc.tree.get_mut(id) {
        node.append(Node::Text(Text { text: text.into() }));
    }
}

/// Whether any ancestor element of `node` has the given tag name.
pub(crate) fn has_ancestor_tag(node: ego_tree::NodeRef<'_, Node>, name: &str) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if let Node::Element(el) = n.value() {
            if el.name() == name {
                return true;
            }
        }
        current = n.parent();
    }
    false
}

/// Collect the ids of all elements matching `selector`, in document order.
pub(crate) fn select_ids(doc: &Html, selector: &Selector) -> Vec<NodeId> {
    doc.select(selector).map(|el| el.id()).collect()
}

/// Element view of a node id, if the node is an element.
pub(crate) fn element<'a>(doc: &'a Html, id: NodeId) -> Option<ElementRef<'a>> {
    doc.tree.get(id).and_then(ElementRef::wrap)
}
