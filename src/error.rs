//! Error types for the page2md library.
//!
//! Only the *edges* of the system can fail: resolving the input (bad path,
//! unreachable URL, non-text payload) and writing the output file. The
//! conversion pipeline itself is total — malformed markup is recovered by the
//! permissive parser, and per-element oddities (a corrupt obfuscated-email
//! value, an anchor without an href, a table without rows) are skipped in
//! place rather than propagated. That is why there is a single fatal error
//! enum here and no per-stage error type.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the page2md library.
#[derive(Debug, Error)]
pub enum Page2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input string is neither an existing file nor a usable URL.
    #[error("Invalid input '{input}': not an existing file, an http(s) URL, or a www host\nProvide a full URL starting with http:// or https://, or a path to a local HTML file.")]
    InvalidInput { input: String },

    /// Input file was not found at the given path.
    #[error("HTML file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The input exists but is not decodable as text.
    ///
    /// This is the only total failure the conversion core reserves for
    /// itself: everything that *is* text gets a best-effort parse.
    #[error("Input is not valid UTF-8 text: '{path}'\npage2md converts HTML text; binary files cannot be processed.")]
    NotText { path: PathBuf },

    /// HTTP URL was syntactically valid but the fetch failed.
    #[error("Failed to fetch '{url}': {reason}\nCheck the URL and your internet connection.")]
    FetchFailed { url: String, reason: String },

    /// Fetch exceeded the configured timeout.
    #[error("Fetch timed out after {secs}s for '{url}'\nIncrease --timeout, or check whether the site is reachable.")]
    FetchTimeout { url: String, secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
