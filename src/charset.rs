//! Character encoding detection
//!
//! The engine receives raw bytes from whatever fetched the document, so it
//! cannot assume UTF-8. Detection follows a three-level cascade:
//!
//! 1. **Content-Type header**: charset parameter, when the caller has one
//! 2. **HTML meta tags**: `<meta charset>` or `<meta http-equiv="Content-Type">`
//! 3. **Default**: UTF-8
//!
//! Detected names are normalized to uppercase. Only the first 1024 bytes of
//! the document are scanned for meta tags; charset declarations belong early
//! in `<head>`.

use regex::Regex;
use std::sync::OnceLock;

/// Default charset when detection fails
const DEFAULT_CHARSET: &str = "UTF-8";

/// Maximum bytes to scan for meta charset tags
const META_SCAN_LIMIT: usize = 1024;

/// Detect character encoding using the three-level cascade
///
/// Always returns a charset name, defaulting to "UTF-8" when neither the
/// Content-Type header nor the document declares one.
///
/// # Examples
///
/// ```rust
/// use markdown_condenser::charset::detect_charset;
///
/// let charset = detect_charset(Some("text/html; charset=ISO-8859-1"), b"<html></html>");
/// assert_eq!(charset, "ISO-8859-1");
///
/// let html = b"<html><head><meta charset=\"utf-8\"></head></html>";
/// assert_eq!(detect_charset(None, html), "UTF-8");
/// ```
pub fn detect_charset(content_type: Option<&str>, html: &[u8]) -> String {
    if let Some(ct) = content_type
        && let Some(charset) = extract_charset_from_content_type(ct)
    {
        return normalize_charset(&charset);
    }

    if let Some(charset) = extract_charset_from_html(html) {
        return normalize_charset(&charset);
    }

    DEFAULT_CHARSET.to_string()
}

/// Extract the charset parameter from a Content-Type header value
///
/// Handles `charset=VALUE`, `charset="VALUE"`, missing whitespace, and
/// trailing parameters. Returns `None` when no charset parameter exists.
pub fn extract_charset_from_content_type(content_type: &str) -> Option<String> {
    static CHARSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex =
        CHARSET_REGEX.get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok());
    let regex = regex.as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a charset declaration from HTML meta tags
///
/// Recognizes the HTML5 form (`<meta charset="...">`) and the HTML4 form
/// (`<meta http-equiv="Content-Type" content="...; charset=...">`). Only
/// the first [`META_SCAN_LIMIT`] bytes are examined; lossy UTF-8 conversion
/// of that prefix is fine for tag matching.
pub fn extract_charset_from_html(html: &[u8]) -> Option<String> {
    let scan_limit = std::cmp::min(html.len(), META_SCAN_LIMIT);
    let html_str = String::from_utf8_lossy(&html[..scan_limit]);

    static HTML5_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html5_regex =
        HTML5_REGEX.get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok());

    if let Some(regex) = html5_regex.as_ref()
        && let Some(caps) = regex.captures(&html_str)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }

    static HTML4_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html4_regex = HTML4_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
        )
        .ok()
    });

    if let Some(regex) = html4_regex.as_ref()
        && let Some(caps) = regex.captures(&html_str)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }

    None
}

/// Normalize a charset name to uppercase
pub fn normalize_charset(charset: &str) -> String {
    charset.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_content_type_charset_basic() {
        assert_eq!(
            extract_charset_from_content_type("text/html; charset=UTF-8"),
            Some("UTF-8".to_string())
        );
    }

    #[test]
    fn test_content_type_charset_quoted_and_unspaced() {
        assert_eq!(
            extract_charset_from_content_type("text/html;charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
    }

    #[test]
    fn test_content_type_charset_extra_params() {
        assert_eq!(
            extract_charset_from_content_type("text/html; charset=UTF-8; boundary=frontier"),
            Some("UTF-8".to_string())
        );
    }

    #[test]
    fn test_content_type_charset_case_insensitive() {
        assert_eq!(
            extract_charset_from_content_type("text/html; CHARSET=utf-8"),
            Some("utf-8".to_string())
        );
    }

    #[test]
    fn test_content_type_without_charset() {
        assert_eq!(extract_charset_from_content_type("text/html"), None);
        assert_eq!(extract_charset_from_content_type(""), None);
    }

    #[test]
    fn test_html5_meta_charset() {
        let html = b"<html><head><meta charset=\"UTF-8\"></head></html>";
        assert_eq!(extract_charset_from_html(html), Some("UTF-8".to_string()));

        let unquoted = b"<html><head><meta charset=UTF-8></head></html>";
        assert_eq!(
            extract_charset_from_html(unquoted),
            Some("UTF-8".to_string())
        );
    }

    #[test]
    fn test_html4_meta_http_equiv() {
        let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\">";
        assert_eq!(
            extract_charset_from_html(html),
            Some("ISO-8859-1".to_string())
        );
    }

    #[test]
    fn test_meta_charset_case_and_whitespace() {
        let html = b"<html><head><META   CHARSET  =  \"utf-8\"  ></head></html>";
        assert_eq!(extract_charset_from_html(html), Some("utf-8".to_string()));
    }

    #[test]
    fn test_meta_charset_absent() {
        let html = b"<html><head><title>Test</title></head></html>";
        assert_eq!(extract_charset_from_html(html), None);
        assert_eq!(extract_charset_from_html(b""), None);
    }

    #[test]
    fn test_meta_charset_beyond_scan_limit_ignored() {
        let mut html = vec![b' '; META_SCAN_LIMIT + 100];
        html.extend_from_slice(b"<meta charset=\"UTF-8\">");
        assert_eq!(extract_charset_from_html(&html), None);
    }

    #[test]
    fn test_cascade_content_type_wins() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head></html>";
        assert_eq!(detect_charset(Some("text/html; charset=UTF-8"), html), "UTF-8");
    }

    #[test]
    fn test_cascade_falls_back_to_meta() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head></html>";
        assert_eq!(detect_charset(Some("text/html"), html), "ISO-8859-1");
    }

    #[test]
    fn test_cascade_defaults_to_utf8() {
        let html = b"<html><head><title>No charset</title></head></html>";
        assert_eq!(detect_charset(None, html), "UTF-8");
    }

    #[test]
    fn test_detected_charset_normalized() {
        assert_eq!(detect_charset(Some("text/html; charset=utf-8"), b""), "UTF-8");
        assert_eq!(normalize_charset("windows-1252"), "WINDOWS-1252");
    }

    proptest! {
        #[test]
        fn prop_content_type_outranks_meta_tag(
            header_charset in prop::sample::select(vec!["utf-8", "iso-8859-1", "windows-1252", "shift_jis", "gb2312"]),
            meta_charset in prop::sample::select(vec!["UTF-8", "ISO-8859-1", "WINDOWS-1252", "SHIFT_JIS", "GB2312"]),
        ) {
            prop_assume!(header_charset.to_uppercase() != meta_charset.to_uppercase());

            let content_type = format!("text/html; charset={header_charset}");
            let html = format!(r#"<html><head><meta charset="{meta_charset}"></head><body>x</body></html>"#);

            let detected = detect_charset(Some(&content_type), html.as_bytes());
            prop_assert_eq!(detected, header_charset.to_uppercase());
        }

        #[test]
        fn prop_meta_tag_used_when_header_has_no_charset(
            meta_charset in prop::sample::select(vec!["utf-8", "iso-8859-1", "windows-1252", "big5"]),
            use_html4_syntax in any::<bool>(),
        ) {
            let html = if use_html4_syntax {
                format!(
                    r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset={meta_charset}"></head></html>"#
                )
            } else {
                format!(r#"<html><head><meta charset="{meta_charset}"></head></html>"#)
            };

            let detected = detect_charset(Some("text/html"), html.as_bytes());
            prop_assert_eq!(detected, meta_charset.to_uppercase());
        }
    }
}
