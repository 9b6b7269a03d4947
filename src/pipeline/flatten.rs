//! Text flattening and final whitespace normalisation.
//!
//! By this point the tree is a skeleton of containers around pre-rendered
//! Markdown text nodes. Flattening joins a small header block (`Title:`,
//! `URL Source:`, the `Markdown Content:` marker, and the page title as a
//! one-time top heading) with every remaining text node, one per line, and
//! then normalises the result.
//!
//! ## Why trim lines before collapsing newlines
//!
//! A line holding only spaces becomes empty when trimmed; if newline runs
//! were collapsed first, that trim could mint a fresh 3-newline run and the
//! function would no longer be idempotent. Trimming first makes every later
//! step stable, so `normalize(normalize(s)) == normalize(s)` holds.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

static RE_EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static RE_SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Produce the final Markdown string from the rewritten tree.
pub(crate) fn render(doc: &Html, title: &str, url: &str) -> String {
    let mut header: Vec<String> = Vec::new();
    if !title.is_empty() {
        header.push(format!("Title: {title}\n"));
    }
    if !url.is_empty() {
        header.push(format!("URL Source: {url}\n"));
    }
    header.push("\nMarkdown Content:\n".to_string());
    if !title.is_empty() {
        header.push(format!("{title}\n{}\n", "=".repeat(title.chars().count())));
    }

    let body = doc
        .tree
        .root()
        .descendants()
        .filter_map(|n| match n.value() {
            Node::Text(t) => Some(&*t.text),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    normalize(&format!("{}\n{body}", header.join("\n")))
}

/// Canonical whitespace layout: trimmed lines, at most one blank line
/// between blocks, single spaces within lines. Pure and idempotent.
pub(crate) fn normalize(text: &str) -> String {
    let trimmed_lines = text
        .replace("\r\n", "\n")
        .lines()
        .map(|line| line.trim_matches(|c| c == ' ' || c == '\t').to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = RE_EXCESS_NEWLINES.replace_all(&trimmed_lines, "\n\n");
    let spaced = RE_SPACE_RUNS.replace_all(&collapsed, " ");
    spaced.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dom;

    #[test]
    fn normalize_collapses_blank_line_runs() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn normalize_trims_each_line_and_squeezes_spaces() {
        assert_eq!(normalize("  a   b  \n\tc\t"), "a b\nc");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "a\n   \n\nb",
            "  x  \n\n\n\n y\t\n",
            "Title: T\n\nMarkdown Content:\nbody   text",
            "",
            "\n\n\n",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn space_only_line_cannot_revive_a_blank_run() {
        // The trap case: trimming "   " to "" mints a new newline run, which
        // must already be collapsed in the same call.
        let out = normalize("a\n   \n\nb");
        assert_eq!(out, "a\n\nb");
        assert_eq!(normalize(&out), out);
    }

    #[test]
    fn header_includes_title_url_marker_and_heading_once() {
        let doc = dom::parse("<p>body text</p>");
        let out = render(&doc, "My Page", "https://example.com/p");
        assert!(out.starts_with("Title: My Page\n"));
        assert!(out.contains("URL Source: https://example.com/p\n"));
        assert!(out.contains("Markdown Content:"));
        assert!(out.contains("My Page\n======="));
        assert_eq!(out.matches("My Page\n=======").count(), 1);
        assert!(out.ends_with("body text"));
    }

    #[test]
    fn empty_title_and_url_omit_their_lines() {
        let doc = dom::parse("<p>just body</p>");
        let out = render(&doc, "", "");
        assert!(!out.contains("Title:"));
        assert!(!out.contains("URL Source:"));
        assert!(out.starts_with("Markdown Content:"));
        assert!(out.contains("just body"));
    }

    #[test]
    fn no_trailing_newline() {
        let doc = dom::parse("<p>x</p>");
        let out = render(&doc, "", "");
        assert!(!out.ends_with('\n'));
    }
}
