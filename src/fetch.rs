//! Input resolution: turn a user-supplied URL or path into HTML text.
//!
//! ## Why the final response URL becomes the base
//!
//! Relative links on a page are relative to where the page actually lives,
//! which after redirects is not necessarily the URL the user typed. Using
//! `Response::url()` as the base keeps resolution correct across `http→https`
//! upgrades and trailing-slash redirects. An explicit `base_url` in the
//! config still overrides it, which is also the only way local files get a
//! base at all.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::error::Page2MdError;

/// HTML text ready for conversion, plus where it came from.
#[derive(Debug)]
pub struct ResolvedInput {
    pub html: String,
    /// Base for relative-URL resolution; empty when none is known.
    pub base_url: String,
    pub fetch_duration: Duration,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to HTML text.
///
/// URLs are fetched over HTTP; a bare `www.` host is upgraded to `https://`
/// first. Anything else is treated as a local file path.
pub async fn resolve_input(
    input: &str,
    config: &ConversionConfig,
) -> Result<ResolvedInput, Page2MdError> {
    if is_url(input) {
        fetch_url(input, config).await
    } else if input.starts_with("www.") {
        fetch_url(&format!("https://{input}"), config).await
    } else {
        read_local(input, config)
    }
}

fn read_local(path_str: &str, config: &ConversionConfig) -> Result<ResolvedInput, Page2MdError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        // A string with no path-ish shape is more likely a mistyped URL than
        // a missing file; steer the error message accordingly.
        let path_like = path_str.contains(['/', '\\'])
            || path_str.ends_with(".html")
            || path_str.ends_with(".htm");
        if path_like {
            return Err(Page2MdError::FileNotFound { path });
        }
        return Err(Page2MdError::InvalidInput {
            input: path_str.to_string(),
        });
    }

    let html = match std::fs::read_to_string(&path) {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(Page2MdError::NotText { path });
        }
        Err(_) => {
            return Err(Page2MdError::FileNotFound { path });
        }
    };

    debug!("read local HTML file: {}", path.display());
    Ok(ResolvedInput {
        html,
        base_url: config.base_url.clone().unwrap_or_default(),
        fetch_duration: Duration::ZERO,
    })
}

async fn fetch_url(url: &str, config: &ConversionConfig) -> Result<ResolvedInput, Page2MdError> {
    info!("fetching page: {}", url);
    let started = Instant::now();

    let mut builder =
        reqwest::Client::builder().timeout(Duration::from_secs(config.fetch_timeout_secs));
    if let Some(ua) = &config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let client = builder.build().map_err(|e| Page2MdError::FetchFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Page2MdError::FetchTimeout {
                url: url.to_string(),
                secs: config.fetch_timeout_secs,
            }
        } else {
            Page2MdError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Page2MdError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    // Redirects may have moved us; the landing URL is the base.
    let final_url = response.url().to_string();

    let html = response.text().await.map_err(|e| Page2MdError::FetchFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let fetch_duration = started.elapsed();
    info!(
        "fetched {} bytes in {} ms",
        html.len(),
        fetch_duration.as_millis()
    );

    let base_url = config.base_url.clone().unwrap_or(final_url);
    Ok(ResolvedInput {
        html,
        base_url,
        fetch_duration,
    })
}
