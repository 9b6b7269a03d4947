//! Output types: the assembled Markdown plus conversion statistics.
//!
//! The pipeline's contract is a single string (`markdown` already contains the
//! `Title:` / `URL Source:` header lines). [`ConversionOutput`] additionally
//! surfaces the extracted title and source URL as fields so programmatic
//! callers and the CLI `--json` mode do not have to re-parse the header out of
//! the text.

use serde::{Deserialize, Serialize};

/// Result of one page conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Cleaned `<title>` text; empty when the page has none.
    pub title: String,

    /// Canonical URL of the page, falling back to the base URL; may be empty.
    pub url_source: String,

    /// The complete Markdown document, header lines included.
    pub markdown: String,

    /// Timing and size statistics.
    pub stats: ConversionStats,
}

/// Statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Size of the input HTML in bytes.
    pub html_bytes: usize,

    /// Size of the produced Markdown in bytes.
    pub markdown_bytes: usize,

    /// Time spent fetching the input. Zero for in-memory/local conversions.
    pub fetch_duration_ms: u64,

    /// Time spent in the conversion pipeline itself.
    pub convert_duration_ms: u64,
}
