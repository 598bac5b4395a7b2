//! HTML5 parsing and re-serialization
//!
//! Parsing uses html5ever, which implements the WHATWG tree-construction
//! algorithm: malformed markup (unclosed tags, misnesting, broken
//! attributes) is repaired the same way a browser would repair it, so the
//! contract here is "bytes in, best-effort tree out". The only real failure
//! modes are encoding-level: bytes that are invalid for the detected
//! charset, or a declared charset we cannot transcode.
//!
//! [`serialize_html`] is the inverse half used by the structural-cleanup
//! pipeline: after the annotation and stripping passes have mutated the
//! tree, it is written back out as HTML rather than Markdown.

use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{RcDom, SerializableHandle};
use std::borrow::Cow;

use crate::charset::detect_charset;
use crate::error::ConversionError;

/// Parse HTML bytes into a DOM tree with charset detection
///
/// The charset cascade checks the optional Content-Type header value first,
/// then the document's own meta tags, then falls back to UTF-8. Non-UTF-8
/// input is transcoded before parsing because html5ever consumes UTF-8.
///
/// # Errors
///
/// - [`ConversionError::InvalidInput`] - input is empty
/// - [`ConversionError::EncodingError`] - bytes are invalid for the detected
///   charset, or the charset is unsupported
///
/// # Examples
///
/// ```rust
/// use markdown_condenser::parser::parse_html_with_charset;
///
/// let html = b"<html><body><h1>Hello</h1></body></html>";
/// let dom = parse_html_with_charset(html, Some("text/html; charset=UTF-8"))
///     .expect("Failed to parse HTML");
/// ```
pub fn parse_html_with_charset(
    html: &[u8],
    content_type: Option<&str>,
) -> Result<RcDom, ConversionError> {
    if html.is_empty() {
        return Err(ConversionError::InvalidInput(
            "HTML input is empty".to_string(),
        ));
    }

    let detected_charset = detect_charset(content_type, html);
    let utf8_str = decode_html_to_utf8(html, &detected_charset)?;

    // Parse directly from a UTF-8 string sink; no Read/Cursor indirection.
    let dom = parse_document(RcDom::default(), Default::default()).one(utf8_str.as_ref());

    Ok(dom)
}

/// Parse HTML bytes into a DOM tree
///
/// Convenience wrapper over [`parse_html_with_charset`] with no
/// Content-Type header: meta tags or the UTF-8 default decide the charset.
///
/// # Examples
///
/// ```rust
/// use markdown_condenser::parser::parse_html;
///
/// let dom = parse_html(b"<h1>Hello</h1>").expect("Failed to parse");
/// ```
pub fn parse_html(html: &[u8]) -> Result<RcDom, ConversionError> {
    parse_html_with_charset(html, None)
}

/// Serialize a DOM tree back to HTML bytes
///
/// Used by the structural-cleanup entry point after the tree-mutation
/// passes. Serialization of an rcdom tree is infallible in practice (the
/// writer is an in-memory buffer); an I/O error is still surfaced rather
/// than swallowed.
pub fn serialize_html(dom: &RcDom) -> Result<Vec<u8>, ConversionError> {
    let mut buf = Vec::new();
    let handle = SerializableHandle::from(dom.document.clone());
    serialize(&mut buf, &handle, SerializeOpts::default())
        .map_err(|e| ConversionError::ParseError(format!("HTML serialization failed: {}", e)))?;
    Ok(buf)
}

fn decode_html_to_utf8<'a>(
    html: &'a [u8],
    detected_charset: &str,
) -> Result<Cow<'a, str>, ConversionError> {
    if detected_charset.eq_ignore_ascii_case("UTF-8") {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            ConversionError::EncodingError(format!(
                "Invalid UTF-8 at byte position {}: {} (detected charset: {})",
                e.valid_up_to(),
                e,
                detected_charset
            ))
        });
    }

    let encoding =
        encoding_rs::Encoding::for_label(detected_charset.as_bytes()).ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Unsupported charset '{}' for HTML parsing",
                detected_charset
            ))
        })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Invalid byte sequence for charset '{}'",
                detected_charset
            ))
        })
}
