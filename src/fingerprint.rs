//! Content fingerprints for cache addressing
//!
//! A fingerprint is the first 128 bits of the BLAKE3 hash of the raw input
//! bytes, hex-encoded. BLAKE3 is fast, deterministic, and
//! collision-resistant far beyond what a conversion cache needs; 128 bits
//! keeps keys short while making accidental collisions negligible.

/// Length of a fingerprint string: 16 bytes hex-encoded
pub const FINGERPRINT_LEN: usize = 32;

/// Compute the fingerprint of raw input bytes.
///
/// Identical bytes always produce the identical fingerprint, across calls
/// and across processes.
///
/// # Examples
///
/// ```rust
/// use markdown_condenser::fingerprint::{FINGERPRINT_LEN, fingerprint};
///
/// let key = fingerprint(b"<html><body>x</body></html>");
/// assert_eq!(key.len(), FINGERPRINT_LEN);
/// assert_eq!(key, fingerprint(b"<html><body>x</body></html>"));
/// ```
pub fn fingerprint(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hex::encode(&hash.as_bytes()[..FINGERPRINT_LEN / 2])
}
