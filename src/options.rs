//! Conversion configuration
//!
//! [`StripConfig`] controls which elements are removed and how images
//! without alternative text are treated. The default strip set is fixed;
//! callers can only add to it. The single escape hatch in the other
//! direction is a per-element `data-llm="keep"` annotation, resolved in
//! [`crate::annotations`].

use std::collections::HashSet;

/// Elements stripped by default. Authors can preserve an individual element
/// with `data-llm="keep"`.
pub const DEFAULT_STRIP_ELEMENTS: [&str; 9] = [
    "nav", "aside", "footer", "header", "script", "style", "noscript", "svg", "iframe",
];

/// Conversion options for stripping behavior
#[derive(Debug, Clone, Default)]
pub struct StripConfig {
    /// Additional tag names to strip, merged with the default set
    pub elements_to_strip: Vec<String>,
    /// If true, remove images without alt text entirely instead of
    /// substituting a generic placeholder
    pub remove_images_no_alt: bool,
}

impl StripConfig {
    /// Create a config with no additions to the default strip set
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective strip set: the default set plus caller additions.
    ///
    /// Membership-only lookups, so iteration order never influences output.
    pub fn effective_strip_set(&self) -> HashSet<&str> {
        let mut set: HashSet<&str> = DEFAULT_STRIP_ELEMENTS.iter().copied().collect();
        for tag in &self.elements_to_strip {
            set.insert(tag.as_str());
        }
        set
    }
}
