//! Cache-wrapped conversion service
//!
//! [`ConversionService`] is the piece the interception layer talks to: it
//! owns a [`StripConfig`] and a [`ConversionCache`] and memoizes the full
//! pipeline by input fingerprint. A hit inside the TTL window skips
//! parsing, rendering and condensation entirely.

use std::time::Duration;

use crate::cache::ConversionCache;
use crate::error::ConversionError;
use crate::fingerprint::fingerprint;
use crate::options::StripConfig;
use crate::tokens::TokenEstimator;

/// A completed conversion with its bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Condensed Markdown output
    pub markdown: String,
    /// Fingerprint of the input bytes, usable as a cache or validator key
    pub fingerprint: String,
    /// Estimated token count of the output
    pub estimated_tokens: u32,
    /// True when the result was served from the cache
    pub cached: bool,
}

/// Conversion pipeline fronted by a result cache
///
/// # Usage
///
/// ```rust
/// use markdown_condenser::options::StripConfig;
/// use markdown_condenser::service::ConversionService;
///
/// let service = ConversionService::new(StripConfig::default());
/// let html = b"<h1>Title</h1>";
/// let first = service.convert(html).expect("conversion failed");
/// let second = service.convert(html).expect("conversion failed");
/// assert_eq!(first, second);
/// ```
pub struct ConversionService {
    config: StripConfig,
    cache: ConversionCache,
    estimator: TokenEstimator,
}

impl ConversionService {
    /// Create a service with the default cache sizing
    pub fn new(config: StripConfig) -> Self {
        Self::with_cache(config, ConversionCache::default())
    }

    /// Create a service around an explicitly sized cache
    pub fn with_cache(config: StripConfig, cache: ConversionCache) -> Self {
        Self {
            config,
            cache,
            estimator: TokenEstimator::new(),
        }
    }

    /// Convenience constructor for callers that only tune cache bounds
    pub fn with_cache_bounds(config: StripConfig, capacity: usize, ttl: Duration) -> Self {
        Self::with_cache(config, ConversionCache::new(capacity, ttl))
    }

    /// Convert HTML to condensed Markdown, memoized by content fingerprint.
    pub fn convert(&self, html: &[u8]) -> Result<String, ConversionError> {
        self.convert_with_stats(html).map(|c| c.markdown)
    }

    /// Convert HTML and report the fingerprint, token estimate, and cache
    /// outcome alongside the Markdown.
    pub fn convert_with_stats(&self, html: &[u8]) -> Result<Conversion, ConversionError> {
        let key = fingerprint(html);

        if let Some(markdown) = self.cache.lookup(&key) {
            let estimated_tokens = self.estimator.estimate(&markdown);
            return Ok(Conversion {
                markdown,
                fingerprint: key,
                estimated_tokens,
                cached: true,
            });
        }

        let markdown = crate::convert_to_markdown(html, &self.config)?;
        self.cache.store(&key, markdown.clone());

        let estimated_tokens = self.estimator.estimate(&markdown);
        Ok(Conversion {
            markdown,
            fingerprint: key,
            estimated_tokens,
            cached: false,
        })
    }

    /// The cache backing this service
    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }
}
