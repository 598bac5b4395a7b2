//! Markdown Condenser - annotation-aware HTML to Markdown engine
//!
//! This library converts rendered HTML into a condensed, semantically
//! equivalent Markdown representation optimized for minimal token count.
//! Document authors steer content retention with inline annotations:
//! `data-llm="keep"` preserves an element the engine would strip,
//! `data-llm="drop"` removes one it would keep, and
//! `data-llm-description` on a script leaves a descriptive line behind
//! after the script itself is removed.
//!
//! # Architecture
//!
//! - `parser`: HTML5 parsing (html5ever) and re-serialization
//! - `charset`: encoding detection and normalization
//! - `annotations`: retention-directive resolution
//! - `strip`: tree-mutating substitution and stripping passes
//! - `converter`: the DOM-to-Markdown rendering walk
//! - `condense`: post-render noise removal and whitespace repair
//! - `fingerprint`: BLAKE3 content addressing
//! - `cache`: fingerprint-keyed result cache (FIFO eviction, lazy TTL)
//! - `service`: cache-wrapped conversion front
//! - `tokens`: output token estimation
//!
//! # Entry points
//!
//! [`convert_to_markdown`] runs the whole pipeline; [`process_html`] stops
//! after the structural cleanup passes and re-serializes HTML for callers
//! that want stripped markup rather than Markdown. Both are total over
//! malformed markup: the parser repairs what it can, and everything
//! downstream renders whatever tree it is given.
//!
//! ```rust
//! use markdown_condenser::{StripConfig, convert_to_markdown};
//!
//! let html = b"<nav>Menu</nav><h1>Title</h1><p>Body text</p>";
//! let markdown = convert_to_markdown(html, &StripConfig::default()).unwrap();
//! assert!(markdown.contains("# Title"));
//! assert!(!markdown.contains("Menu"));
//! ```

pub mod annotations;
pub mod cache;
pub mod charset;
pub mod condense;
pub mod converter;
pub mod error;
pub mod fingerprint;
pub mod options;
pub mod parser;
pub mod service;
pub mod strip;
pub mod tokens;

// Re-export main types for convenience
pub use cache::ConversionCache;
pub use condense::condense;
pub use converter::MarkdownConverter;
pub use error::ConversionError;
pub use fingerprint::fingerprint;
pub use options::{DEFAULT_STRIP_ELEMENTS, StripConfig};
pub use service::{Conversion, ConversionService};
pub use tokens::TokenEstimator;

/// Convert HTML bytes to condensed Markdown.
///
/// Runs the full pipeline: parse, annotation-aware rendering walk,
/// condensation. Empty input is an empty document, not an error; malformed
/// markup degrades to whatever the parser could recover.
///
/// # Errors
///
/// Fails only when the parsing layer cannot produce a tree at all (bytes
/// invalid for the detected charset, or an unsupported declared charset).
pub fn convert_to_markdown(html: &[u8], config: &StripConfig) -> Result<String, ConversionError> {
    if html.is_empty() {
        return Ok(String::new());
    }
    let dom = parser::parse_html(html)?;
    Ok(MarkdownConverter::with_config(config.clone()).convert(&dom))
}

/// Strip and annotate HTML without converting to Markdown.
///
/// Runs the tree-mutation passes - script-description substitution, image
/// substitution, element stripping - and re-serializes the cleaned tree as
/// HTML. Empty input yields empty output.
///
/// # Errors
///
/// Fails only when the parsing layer cannot produce a tree; see
/// [`convert_to_markdown`].
pub fn process_html(html: &[u8], config: &StripConfig) -> Result<Vec<u8>, ConversionError> {
    if html.is_empty() {
        return Ok(Vec::new());
    }
    let dom = parser::parse_html(html)?;

    // Substitution runs first so descriptions and alt text survive the
    // stripping pass.
    strip::substitute_scripts(&dom.document);
    strip::substitute_images(&dom.document, config.remove_images_no_alt);
    strip::strip_elements(&dom.document, &config.effective_strip_set());

    parser::serialize_html(&dom)
}
