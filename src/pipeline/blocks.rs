//! Block element serialisation: replace block-level elements with text nodes
//! holding pre-rendered Markdown.
//!
//! Order matters and is fixed: labels, headings, buttons, lists, strong,
//! tables, spans, paragraphs. Constructs that nest rely on it — a heading
//! inside a table cell must already be text when the table flattens its rows,
//! and a label must merge with its sibling before the paragraph pass folds
//! that sibling into a line.
//!
//! Nested occurrences of the same construct (a list inside a list, a table
//! inside a table cell) are handled outermost-wins: the outer element's text
//! extraction absorbs the inner one, and the attachment check skips the inner
//! element's own turn.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};

use super::dom::{self, sel};

static SEL_LABEL: Lazy<Selector> = sel!("label");
static SEL_HEADING: Lazy<Selector> = sel!("h1, h2, h3, h4, h5, h6");
static SEL_BUTTON: Lazy<Selector> = sel!("button");
static SEL_LIST: Lazy<Selector> = sel!("ul, ol");
static SEL_LI: Lazy<Selector> = sel!("li");
static SEL_STRONG: Lazy<Selector> = sel!("strong");
static SEL_TABLE: Lazy<Selector> = sel!("table");
static SEL_TR: Lazy<Selector> = sel!("tr");
static SEL_CELL: Lazy<Selector> = sel!("th, td");
static SEL_SPAN: Lazy<Selector> = sel!("span");
static SEL_P: Lazy<Selector> = sel!("p");

/// Run every block pass over the document, in the fixed order.
pub(crate) fn serialize(doc: &mut Html) {
    labels(doc);
    headings(doc);
    buttons(doc);
    lists(doc);
    strong(doc);
    tables(doc);
    spans(doc);
    paragraphs(doc);
}

/// Form labels merge with their caption: a label followed by an element
/// sibling that carries no `href`/`src` and is not a table collapses with it
/// into one line of text. Anything else leaves the label's own text.
fn labels(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_LABEL);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }

        struct Plan {
            own: String,
            merge: Option<(NodeId, String)>,
        }
        let plan = {
            let Some(el) = dom::element(doc, id) else {
                continue;
            };
            let own = dom::cleaned_text(*el);

            let mut sibling = el.next_sibling();
            while let Some(s) = sibling {
                if !s.value().is_element() {
                    sibling = s.next_sibling();
                    continue;
                }
                break;
            }

            let merge = sibling.and_then(|s| {
                let Node::Element(e) = s.value() else {
                    return None;
                };
                let has_resource = ["href", "src"]
                    .iter()
                    .any(|a| e.attr(a).is_some_and(|v| !v.trim().is_empty()));
                if has_resource || e.name() == "table" {
                    return None;
                }
                Some((s.id(), dom::cleaned_text(s)))
            });
            Plan { own, merge }
        };

        match plan.merge {
            Some((sibling_id, sibling_text)) => {
                let combined = dom::clean_text(&format!("{} {}", plan.own, sibling_text));
                dom::replace_with_text(doc, id, &combined);
                dom::detach(doc, sibling_id);
            }
            None => dom::replace_with_text(doc, id, &plan.own),
        }
    }
}

fn headings(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_HEADING);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let rendered = {
            let Some(el) = dom::element(doc, id) else {
                continue;
            };
            let level = el.value().name().as_bytes()[1] - b'0';
            let text = dom::cleaned_text(*el);
            if text.is_empty() {
                // Empty headings vanish in the cleanup pass.
                continue;
            }
            if level == 1 {
                let underline = "=".repeat(text.chars().count());
                format!("{text}\n{underline}\n\n")
            } else {
                format!("{} {text}\n\n", "#".repeat(level as usize))
            }
        };
        dom::replace_with_text(doc, id, &rendered);
    }
}

/// Buttons render as plain text, no Markdown emphasis.
fn buttons(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_BUTTON);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let text = match dom::element(doc, id) {
            Some(el) => dom::cleaned_text(*el),
            None => continue,
        };
        dom::replace_with_text(doc, id, &format!("{text}\n"));
    }
}

fn lists(doc: &mut Html) {
    let list_ids = dom::select_ids(doc, &SEL_LIST);
    for id in list_ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let (ordered, item_ids) = {
            let Some(el) = dom::element(doc, id) else {
                continue;
            };
            let ordered = el.value().name() == "ol";
            let item_ids: Vec<NodeId> = el.select(&SEL_LI).map(|li| li.id()).collect();
            (ordered, item_ids)
        };

        let mut lines: Vec<String> = Vec::new();
        for item in item_ids {
            // Items of a nested list detach with their outer item.
            if !dom::is_attached(&doc.tree, item) {
                continue;
            }
            let text = match dom::element(doc, item) {
                Some(el) => dom::cleaned_text(*el),
                None => String::new(),
            };
            if !text.is_empty() {
                // Numbering counts emitted items only, so skipped empties
                // leave no gaps.
                if ordered {
                    lines.push(format!("{}. {text}", lines.len() + 1));
                } else {
                    lines.push(format!("* {text}"));
                }
            }
            dom::detach(doc, item);
        }

        if lines.is_empty() {
            dom::detach(doc, id);
        } else {
            dom::replace_with_text(doc, id, &format!("{}\n", lines.join("\n")));
        }
    }
}

fn strong(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_STRONG);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let text = match dom::element(doc, id) {
            Some(el) => dom::cleaned_text(*el),
            None => continue,
        };
        if !text.is_empty() {
            dom::replace_with_text(doc, id, &format!("**{text}**"));
        }
    }
}

fn tables(doc: &mut Html) {
    let table_ids = dom::select_ids(doc, &SEL_TABLE);
    for id in table_ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let rendered = {
            let Some(el) = dom::element(doc, id) else {
                continue;
            };
            let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
            for tr in el.select(&SEL_TR) {
                let mut first_cell_colspan = false;
                let mut cells: Vec<String> = Vec::new();
                for (i, cell) in tr.select(&SEL_CELL).enumerate() {
                    if i == 0 && cell.value().attr("colspan").is_some() {
                        first_cell_colspan = true;
                    }
                    cells.push(dom::cleaned_text(*cell));
                }
                rows.push((first_cell_colspan, cells));
            }
            // A rowless table is left as-is.
            if rows.is_empty() {
                continue;
            }

            let mut lines: Vec<String> = Vec::new();
            let mut rows = rows.as_slice();

            // A leading colspan cell is a caption row: render it as a
            // standalone one-column header above the real table.
            if let Some((true, cells)) = rows.first() {
                let caption = cells.first().cloned().unwrap_or_default();
                lines.push(format!("| {caption} |"));
                lines.push("| --- |".to_string());
                rows = &rows[1..];
            }

            if let Some((_, header)) = rows.first() {
                lines.push(format!("| {} |", header.join(" | ")));
                lines.push(format!(
                    "| {} |",
                    vec!["---"; header.len()].join(" | ")
                ));
                for (_, cells) in &rows[1..] {
                    lines.push(format!("| {} |", cells.join(" | ")));
                }
            }

            format!("\n{}\n\n", lines.join("\n"))
        };
        dom::replace_with_text(doc, id, &rendered);
    }
}

/// Spans carry no semantic weight; only their text survives.
fn spans(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_SPAN);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let text = match dom::element(doc, id) {
            Some(el) => dom::cleaned_text(*el),
            None => continue,
        };
        if !text.is_empty() {
            dom::replace_with_text(doc, id, &format!("{text}\n"));
        }
    }
}

/// Paragraphs join the raw text of their children so Markdown produced by
/// earlier passes (`[label](href)`, `**bold**`) survives intact, then clean
/// the joined run as one line.
fn paragraphs(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_P);
    for id in ids {
        if !dom::is_attached(&doc.tree, id) {
            continue;
        }
        let text = {
            let Some(node) = doc.tree.get(id) else {
                continue;
            };
            let joined = node
                .children()
                .map(|child| match child.value() {
                    Node::Text(t) => t.text.to_string(),
                    _ => dom::raw_text(child),
                })
                .collect::<Vec<_>>()
                .join(" ");
            dom::clean_text(&joined)
        };
        if !text.is_empty() {
            dom::replace_with_text(doc, id, &format!("{text}\n"));
        }
    }
}
