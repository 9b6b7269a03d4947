//! Email de-obfuscation: reverse the Cloudflare `data-cfemail` encoding.
//!
//! Cloudflare's scrape-shield replaces `mailto:` text with a hex blob in a
//! `data-cfemail` attribute: the first byte is an XOR key, every following
//! byte is one obfuscated Latin-1 code point. Decoding it up front means the
//! address flows through the rest of the pipeline as ordinary text and ends
//! up readable in the Markdown.

use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use tracing::debug;

use super::dom::{self, sel};

/// Attribute the obfuscator stores its payload in.
const MARKER_ATTR: &str = "data-cfemail";

static SEL_CFEMAIL: Lazy<Selector> = sel!("[data-cfemail]");

/// Decode every obfuscated email in the document, in place.
///
/// Each decoded address replaces the carrying element's text content and the
/// marker attribute is dropped. A malformed payload (odd length, non-hex)
/// poisons only its own element: it is skipped and the rest of the tree is
/// processed normally.
pub(crate) fn decode_all(doc: &mut Html) {
    let ids = dom::select_ids(doc, &SEL_CFEMAIL);
    for id in ids {
        let Some(value) = dom::element(doc, id)
            .and_then(|el| el.value().attr(MARKER_ATTR))
            .map(str::to_owned)
        else {
            continue;
        };
        match decode_cfemail(&value) {
            Some(email) => {
                dom::set_text_content(doc, id, &email);
                remove_marker(doc, id);
            }
            None => {
                debug!("skipping malformed {} value: {:?}", MARKER_ATTR, value);
            }
        }
    }
}

/// Decode one hex payload: `key` is the first byte, every later byte XORs
/// with it. Returns `None` for odd-length or non-hex input.
pub(crate) fn decode_cfemail(value: &str) -> Option<String> {
    if !value.is_ascii() || value.len() < 2 || value.len() % 2 != 0 {
        return None;
    }
    let mut bytes = (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&value[i..i + 2], 16).ok());
    let key = bytes.next()??;
    bytes
        .map(|b| b.map(|b| char::from(b ^ key)))
        .collect::<Option<String>>()
}

fn remove_marker(doc: &mut Html, id: ego_tree::NodeId) {
    if let Some(mut node) = doc.tree.get_mut(id) {
        if let Node::Element(el) = node.value() {
            el.attrs.retain(|name, _| name.local.as_ref() != MARKER_ATTR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of `decode_cfemail` for the round-trip law.
    fn encode_cfemail(text: &str, key: u8) -> String {
        let mut out = format!("{key:02x}");
        for b in text.bytes() {
            out.push_str(&format!("{:02x}", b ^ key));
        }
        out
    }

    #[test]
    fn decode_known_value() {
        let encoded = encode_cfemail("hi@example.com", 0x42);
        assert_eq!(decode_cfemail(&encoded).as_deref(), Some("hi@example.com"));
    }

    #[test]
    fn round_trip_law() {
        for key in [0x00, 0x01, 0x7f, 0xaa, 0xff] {
            let addr = "first.last+tag@sub.example.org";
            assert_eq!(
                decode_cfemail(&encode_cfemail(addr, key)).as_deref(),
                Some(addr),
                "key {key:#04x}"
            );
        }
    }

    #[test]
    fn malformed_values_rejected() {
        assert_eq!(decode_cfemail(""), None);
        assert_eq!(decode_cfemail("a"), None); // odd length
        assert_eq!(decode_cfemail("zz00"), None); // non-hex
        assert_eq!(decode_cfemail("42abc"), None); // odd length
        assert_eq!(decode_cfemail("4é"), None); // non-ASCII
    }

    #[test]
    fn decodes_every_match_and_strips_marker() {
        let a = encode_cfemail("a@x.io", 0x10);
        let b = encode_cfemail("b@y.io", 0x99);
        let html = format!(
            r#"<p><span data-cfemail="{a}">[protected]</span></p>
               <p><span data-cfemail="{b}">[protected]</span></p>"#
        );
        let mut doc = dom::parse(&html);
        decode_all(&mut doc);

        let text = dom::cleaned_text(doc.tree.root());
        assert!(text.contains("a@x.io"));
        assert!(text.contains("b@y.io"));
        assert!(!text.contains("[protected]"));
        assert_eq!(doc.select(&SEL_CFEMAIL).count(), 0, "markers removed");
    }

    #[test]
    fn malformed_element_skipped_siblings_survive() {
        let good = encode_cfemail("ok@x.io", 0x33);
        let html = format!(
            r#"<span data-cfemail="nothex">bad</span><span data-cfemail="{good}">x</span>"#
        );
        let mut doc = dom::parse(&html);
        decode_all(&mut doc);

        let text = dom::cleaned_text(doc.tree.root());
        assert!(text.contains("bad"), "malformed element left untouched");
        assert!(text.contains("ok@x.io"), "valid sibling still decoded");
    }
}
