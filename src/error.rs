//! Error types for conversion operations

use std::fmt;

/// Errors that can occur during HTML to Markdown conversion
///
/// The only failure surface is the parsing layer: input bytes that cannot
/// be decoded for the detected charset, a declared charset we cannot
/// transcode, or empty input handed directly to the parser. Every stage
/// downstream of parsing (stripping, substitution, rendering, condensation)
/// is total over any tree shape and does not produce errors.
#[derive(Debug)]
pub enum ConversionError {
    /// HTML parsing failed
    ParseError(String),
    /// Character encoding error
    EncodingError(String),
    /// Invalid input data
    InvalidInput(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConversionError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ConversionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}
