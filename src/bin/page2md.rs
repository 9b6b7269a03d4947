//! CLI binary for page2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use page2md::{convert, convert_to_file, ConversionConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a page to stdout
  page2md https://example.com/article

  # Convert to a file
  page2md https://example.com/article -o article.md

  # Bare www hosts work too (https:// is assumed)
  page2md www.example.com -o home.md

  # Convert a saved page; relative links need an explicit base
  page2md snapshot.html --base-url https://example.com/docs/

  # Keep image references, drop navigation chrome
  page2md https://example.com --images --no-headers --no-footers

  # Prose only, no links at all
  page2md https://example.com/article --no-links

  # Structured JSON (title, URL source, markdown, stats)
  page2md --json https://example.com > page.json

ENVIRONMENT VARIABLES:
  PAGE2MD_OUTPUT      Default output file (-o)
  PAGE2MD_BASE_URL    Default base URL override
  PAGE2MD_TIMEOUT     Fetch timeout in seconds
  PAGE2MD_USER_AGENT  User-Agent header for fetches
"#;

/// Convert web pages and local HTML files to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "page2md",
    version,
    about = "Convert web pages and local HTML files to Markdown",
    long_about = "Convert a rendered web page (URL or saved HTML file) to clean, readable \
Markdown. Scripts, styles, comments, and loading chrome are stripped; links, images, \
headings, lists, and tables become their Markdown equivalents; obfuscated email \
addresses are decoded.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTTP/HTTPS URL, bare www host, or local HTML file path.
    input: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "PAGE2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Base URL for resolving relative links (overrides the fetched URL).
    #[arg(
        long,
        env = "PAGE2MD_BASE_URL",
        long_help = "Base URL used to resolve relative links and images. Defaults to the \
final URL of the fetch (after redirects); required for meaningful resolution when \
converting a local file."
    )]
    base_url: Option<String>,

    /// Include image references as ![alt](src).
    #[arg(long)]
    images: bool,

    /// Drop all links (keeps their text out of the output entirely).
    #[arg(long)]
    no_links: bool,

    /// Drop <header> regions.
    #[arg(long)]
    no_headers: bool,

    /// Drop <footer> regions.
    #[arg(long)]
    no_footers: bool,

    /// Fetch timeout in seconds.
    #[arg(long, env = "PAGE2MD_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// User-Agent header for fetches.
    #[arg(long, env = "PAGE2MD_USER_AGENT")]
    user_agent: Option<String>,

    /// Output structured JSON (ConversionOutput) instead of Markdown.
    #[arg(long, env = "PAGE2MD_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAGE2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAGE2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = convert_to_file(&cli.input, output_path, &config)
            .await
            .context("Conversion failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} → {}  {}",
                green("✔"),
                dim(&format!("{} bytes HTML", stats.html_bytes)),
                dim(&format!("{} bytes Markdown", stats.markdown_bytes)),
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   fetched in {}ms, converted in {}ms",
                stats.fetch_duration_ms, stats.convert_duration_ms
            );
        }
    } else {
        let output = convert(&cli.input, &config)
            .await
            .context("Conversion failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            // Ensure a trailing newline on stdout.
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .include_images(cli.images)
        .include_links(!cli.no_links)
        .include_headers(!cli.no_headers)
        .include_footers(!cli.no_footers)
        .fetch_timeout_secs(cli.timeout);

    if let Some(ref base) = cli.base_url {
        builder = builder.base_url(base.clone());
    }
    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    Ok(builder.build()?)
}
