//! # page2md
//!
//! Convert rendered web pages to clean, readable Markdown.
//!
//! ## Why this crate?
//!
//! Raw page HTML is a terrible retrieval corpus — scripts, trackers, spinner
//! chrome, obfuscated emails, and layout scaffolding drown the content.
//! page2md rewrites the parsed document tree in place through a fixed
//! sequence of passes and flattens what remains into Markdown with a small
//! `Title:` / `URL Source:` header, a shape that suits text retrieval and
//! LLM ingestion.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Parse     permissive parse into a mutable document tree
//!  ├─ 2. Emails    decode XOR-obfuscated addresses in marker attributes
//!  ├─ 3. Metadata  extract <title> and canonical URL
//!  ├─ 4. Prune     drop scripts/styles/comments + flag-excluded categories
//!  ├─ 5. Links     anchors/images → [label](href), ![alt](src)
//!  ├─ 6. Blocks    headings, lists, tables, labels … → inline Markdown
//!  ├─ 7. Cleanup   remove emptied containers, spinners, hidden elements
//!  └─ 8. Flatten   header + visible text, whitespace-normalised
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page2md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("https://example.com/article", &config).await?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! Already holding HTML text? [`convert_html`] is pure and synchronous:
//!
//! ```rust
//! use page2md::{convert_html, ConversionConfig};
//!
//! let out = convert_html("<h2>Hi</h2>", "https://example.com", &ConversionConfig::default());
//! assert!(out.markdown.contains("## Hi"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `page2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! page2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod output;
mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_html, convert_sync, convert_to_file};
pub use error::Page2MdError;
pub use output::{ConversionOutput, ConversionStats};
