//! Configuration types for HTML-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across tasks, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The flag set keeps growing (four inclusion flags today, fetch knobs
//! besides). The builder pattern lets callers set only what they care about
//! and rely on well-documented defaults for the rest.

use crate::error::Page2MdError;
use serde::{Deserialize, Serialize};

/// Configuration for one HTML-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use page2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .include_images(true)
///     .include_footers(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Emit `![alt](src)` for images. Default: false.
    ///
    /// Off by default because image links are dead weight for the typical
    /// downstream consumer (text retrieval, LLM ingestion): they cost tokens
    /// and carry no extractable text beyond the alt attribute.
    pub include_images: bool,

    /// Emit `[label](href)` for anchors. Default: true.
    ///
    /// Links usually *are* content — navigation targets, citations, contact
    /// addresses. Disable when only the prose matters.
    pub include_links: bool,

    /// Keep `<header>` regions. Default: true.
    pub include_headers: bool,

    /// Keep `<footer>` regions. Default: true.
    pub include_footers: bool,

    /// Base URL override for resolving relative links and images.
    ///
    /// When the input is fetched from the network, the final response URL
    /// (after redirects) is the natural base and this field is normally left
    /// `None`. It is required for meaningful link resolution when converting
    /// a local HTML file, and it also feeds the `URL Source:` header line
    /// when the page declares no canonical URL.
    pub base_url: Option<String>,

    /// Timeout for fetching URL inputs, in seconds. Default: 60.
    pub fetch_timeout_secs: u64,

    /// User-Agent header for URL inputs. `None` uses the HTTP client default.
    pub user_agent: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            include_images: false,
            include_links: true,
            include_headers: true,
            include_footers: true,
            base_url: None,
            fetch_timeout_secs: 60,
            user_agent: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn include_images(mut self, v: bool) -> Self {
        self.config.include_images = v;
        self
    }

    pub fn include_links(mut self, v: bool) -> Self {
        self.config.include_links = v;
        self
    }

    pub fn include_headers(mut self, v: bool) -> Self {
        self.config.include_headers = v;
        self
    }

    pub fn include_footers(mut self, v: bool) -> Self {
        self.config.include_footers = v;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Page2MdError> {
        let c = &self.config;
        if c.fetch_timeout_secs == 0 {
            return Err(Page2MdError::InvalidConfig(
                "Fetch timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref base) = c.base_url {
            if !base.is_empty() && url::Url::parse(base).is_err() {
                return Err(Page2MdError::InvalidConfig(format!(
                    "Base URL '{base}' is not an absolute URL"
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let c = ConversionConfig::default();
        assert!(!c.include_images);
        assert!(c.include_links);
        assert!(c.include_headers);
        assert!(c.include_footers);
        assert_eq!(c.fetch_timeout_secs, 60);
    }

    #[test]
    fn builder_sets_flags() {
        let c = ConversionConfig::builder()
            .include_images(true)
            .include_links(false)
            .base_url("https://example.com")
            .build()
            .unwrap();
        assert!(c.include_images);
        assert!(!c.include_links);
        assert_eq!(c.base_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn builder_rejects_relative_base_url() {
        let err = ConversionConfig::builder()
            .base_url("/just/a/path")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("absolute URL"));
    }

    #[test]
    fn timeout_clamped_to_one() {
        let c = ConversionConfig::builder()
            .fetch_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(c.fetch_timeout_secs, 1);
    }
}
