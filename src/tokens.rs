//! Token count estimation for LLM context windows

/// Token estimator using a character-based heuristic
///
/// The engine exists to shrink token counts, so the conversion service
/// reports an estimate alongside its output. Character count divided by a
/// chars-per-token ratio is fast and approximate - not a replacement for
/// real tokenization.
pub struct TokenEstimator {
    /// Characters per token (default: 4.0 for English)
    chars_per_token: f32,
}

impl TokenEstimator {
    /// Create an estimator with the default ratio
    pub fn new() -> Self {
        Self {
            chars_per_token: 4.0,
        }
    }

    /// Create an estimator with a custom chars-per-token ratio
    pub fn with_chars_per_token(chars_per_token: f32) -> Self {
        Self { chars_per_token }
    }

    /// Estimate the token count of Markdown text
    pub fn estimate(&self, markdown: &str) -> u32 {
        let char_count = markdown.chars().count();
        (char_count as f32 / self.chars_per_token).ceil() as u32
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_estimation() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate(""), 0);
        // 15 chars / 4 = 3.75, rounded up
        assert_eq!(estimator.estimate("This is a test."), 4);
    }

    #[test]
    fn test_ceiling_behavior() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate("1234"), 1);
        assert_eq!(estimator.estimate("12345"), 2);
    }

    #[test]
    fn test_custom_ratio() {
        let estimator = TokenEstimator::with_chars_per_token(5.0);
        assert_eq!(estimator.estimate("12345"), 1);
        assert_eq!(estimator.estimate("123456"), 2);
    }

    #[test]
    fn test_unicode_counts_chars_not_bytes() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate("café"), 1);
        assert_eq!(estimator.estimate("Hello 世界"), 2);
    }

    proptest! {
        #[test]
        fn prop_estimate_is_monotonic_under_appending(
            lhs in "\\PC{0,128}",
            rhs in "\\PC{0,128}",
        ) {
            let estimator = TokenEstimator::new();
            let combined = format!("{lhs}{rhs}");
            prop_assert!(
                estimator.estimate(&combined) >= estimator.estimate(&lhs),
                "Appending content must not reduce the estimate"
            );
        }
    }
}
