//! Conversion entry points.
//!
//! [`convert`] resolves an input (URL or local file), runs the rewriting
//! pipeline, and returns the Markdown with stats. [`convert_html`] is the
//! pure core for callers that already hold HTML text — it does no I/O and
//! cannot fail, which is also what makes it trivially safe to run from many
//! tasks at once.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::error::Page2MdError;
use crate::fetch;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline;

/// Convert a web page or local HTML file to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — HTTP/HTTPS URL, bare `www.` host, or local file path
/// * `config` — Conversion configuration
///
/// # Errors
/// Returns `Err(Page2MdError)` only for input failures: an unusable input
/// string, a missing or non-text file, or a failed/timed-out fetch. Once
/// HTML text is in hand, conversion always succeeds.
pub async fn convert(
    input: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Page2MdError> {
    let input = input.as_ref();
    info!("starting conversion: {}", input);

    let resolved = fetch::resolve_input(input, config).await?;
    let fetch_duration_ms = resolved.fetch_duration.as_millis() as u64;

    let mut output = convert_html(&resolved.html, &resolved.base_url, config);
    output.stats.fetch_duration_ms = fetch_duration_ms;

    info!(
        "conversion complete: {} bytes of HTML → {} bytes of Markdown in {}ms",
        output.stats.html_bytes, output.stats.markdown_bytes, output.stats.convert_duration_ms
    );
    Ok(output)
}

/// Convert HTML text already in memory. Pure: no I/O, never fails.
///
/// `base_url` resolves relative links and images; pass an empty string when
/// none is known (relative URLs then pass through unresolved). A `base_url`
/// set in `config` overrides the argument.
pub fn convert_html(html: &str, base_url: &str, config: &ConversionConfig) -> ConversionOutput {
    let base_url = config.base_url.as_deref().unwrap_or(base_url);
    let started = Instant::now();

    let result = pipeline::run(html, base_url, config);

    let convert_duration_ms = started.elapsed().as_millis() as u64;
    debug!(
        title = %result.title,
        url_source = %result.url_source,
        "pipeline finished in {}ms",
        convert_duration_ms
    );

    let stats = ConversionStats {
        html_bytes: html.len(),
        markdown_bytes: result.markdown.len(),
        fetch_duration_ms: 0,
        convert_duration_ms,
    };
    ConversionOutput {
        title: result.title,
        url_source: result.url_source,
        markdown: result.markdown,
        stats,
    }
}

/// Convert and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Page2MdError> {
    let output = convert(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Page2MdError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(|e| Page2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Page2MdError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Page2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Page2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_html_populates_stats() {
        let html = "<title>T</title><p>hello</p>";
        let out = convert_html(html, "", &ConversionConfig::default());
        assert_eq!(out.title, "T");
        assert_eq!(out.stats.html_bytes, html.len());
        assert_eq!(out.stats.markdown_bytes, out.markdown.len());
        assert_eq!(out.stats.fetch_duration_ms, 0);
    }

    #[test]
    fn config_base_url_overrides_argument() {
        let config = ConversionConfig::builder()
            .base_url("https://override.example")
            .build()
            .unwrap();
        let out = convert_html(r#"<a href="/p">go</a>"#, "https://arg.example", &config);
        assert!(
            out.markdown.contains("[go](https://override.example/p)"),
            "got: {}",
            out.markdown
        );
    }
}
