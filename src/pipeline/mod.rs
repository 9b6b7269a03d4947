//! The HTML→Markdown rewriting pipeline.
//!
//! Eight stages run in a fixed order over one mutable document tree:
//!
//! ```text
//! parse → emails → metadata → prune → links/images → blocks → cleanup → flatten
//! ```
//!
//! Each stage mutates the tree in place and the next observes the result;
//! there is no branching between alternate pipelines. The tree is owned
//! exclusively for the duration of one call, so independent conversions can
//! run concurrently without shared state.

mod blocks;
mod cleanup;
mod dom;
mod email;
mod flatten;
mod links;
mod meta;
mod prune;

use tracing::debug;

use crate::config::ConversionConfig;

/// Result of one pipeline run: the rendered Markdown plus the metadata the
/// header was built from.
pub(crate) struct PipelineOutput {
    pub title: String,
    pub url_source: String,
    pub markdown: String,
}

/// Convert one HTML document to Markdown.
///
/// `base_url` resolves relative links and images and seeds the `URL Source:`
/// header when the page declares no canonical URL. It may be empty, in which
/// case relative URLs pass through unresolved.
pub(crate) fn run(html: &str, base_url: &str, config: &ConversionConfig) -> PipelineOutput {
    let mut doc = dom::parse(html);

    email::decode_all(&mut doc);

    let title = meta::extract_title(&doc);
    let url_source = meta::extract_canonical_url(&doc, base_url);
    debug!(%title, %url_source, "extracted page metadata");

    prune::remove_boilerplate(&mut doc);
    prune::apply_flags(&mut doc, config);
    links::resolve(&mut doc, base_url);
    blocks::serialize(&mut doc);
    cleanup::sweep(&mut doc);

    let markdown = flatten::render(&doc, &title, &url_source);
    PipelineOutput {
        title,
        url_source,
        markdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default(html: &str, base_url: &str) -> PipelineOutput {
        run(html, base_url, &ConversionConfig::default())
    }

    #[test]
    fn full_page_end_to_end() {
        let html = r#"
            <html>
            <head>
                <title> Example  Page </title>
                <link rel="canonical" href="https://example.com/page">
                <script>tracking();</script>
            </head>
            <body>
                <header><a href="/home">Home</a></header>
                <h1>Welcome</h1>
                <p>For details, read the <a href="/docs">docs</a></p>
                <ul><li>one</li><li></li><li>two</li></ul>
                <div class="lds-roller"></div>
            </body>
            </html>"#;
        let out = run_default(html, "https://example.com");

        assert_eq!(out.title, "Example Page");
        assert_eq!(out.url_source, "https://example.com/page");
        assert!(out.markdown.starts_with("Title: Example Page"));
        assert!(out.markdown.contains("URL Source: https://example.com/page"));
        assert!(out.markdown.contains("Welcome\n======="));
        assert!(out.markdown.contains("[docs](https://example.com/docs)"));
        assert!(out.markdown.contains("* one\n* two"));
        assert!(!out.markdown.contains("tracking"));
        assert!(!out.markdown.contains("lds-roller"));
    }

    #[test]
    fn excluded_links_never_reach_the_resolver() {
        let html = r#"<body><a href="https://example.com/x">click</a><p>text</p></body>"#;
        let config = ConversionConfig::builder()
            .include_links(false)
            .build()
            .unwrap();
        let out = run(html, "https://example.com", &config);
        assert!(!out.markdown.contains("]("));
        assert!(out.markdown.contains("text"));
    }

    #[test]
    fn missing_metadata_produces_bare_body() {
        let out = run_default("<p>only text</p>", "");
        assert_eq!(out.title, "");
        assert_eq!(out.url_source, "");
        assert!(out.markdown.starts_with("Markdown Content:"));
        assert!(out.markdown.contains("only text"));
    }
}
