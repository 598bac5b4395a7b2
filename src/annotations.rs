//! Author annotations for content retention
//!
//! Document authors override the default stripping decisions with inline
//! attributes:
//!
//! - `data-llm="keep"` exempts an otherwise-strippable element (and its
//!   subtree) from the strip set
//! - `data-llm="drop"` removes an element and its subtree regardless of tag
//! - `data-llm-description="..."` on a script substitutes a descriptive
//!   text line before the script itself is stripped
//!
//! Precedence, evaluated per element: drop outranks keep, keep outranks the
//! strip set, and a description never survives an explicit drop. The
//! attribute-access helpers here are first-match-wins over the element's
//! attribute list, shared by the stripping pass and the renderer.

use markup5ever_rcdom::{Handle, NodeData};

/// Attribute carrying the retention directive
pub const RETENTION_ATTR: &str = "data-llm";

/// Attribute carrying a script description
pub const DESCRIPTION_ATTR: &str = "data-llm-description";

/// Prefix emitted in front of a substituted script description
pub const SCRIPT_DESCRIPTION_PREFIX: &str = "Javascript description: ";

/// Resolved retention directive for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// `data-llm="keep"`: exempt from the strip set
    Keep,
    /// `data-llm="drop"`: remove regardless of tag
    Drop,
    /// No directive (or an unrecognized value)
    Default,
}

/// Resolve the retention directive on an element.
///
/// Non-element nodes and unrecognized attribute values resolve to
/// [`Retention::Default`].
pub fn retention(node: &Handle) -> Retention {
    match get_attr(node, RETENTION_ATTR).as_deref() {
        Some("keep") => Retention::Keep,
        Some("drop") => Retention::Drop,
        _ => Retention::Default,
    }
}

/// First-match-wins attribute lookup on an element node.
///
/// HTML permits duplicate attribute keys; the first occurrence wins, which
/// is also the order html5ever preserves.
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string())
    } else {
        None
    }
}

/// The script description for substitution, if one is present.
///
/// Returns the raw attribute value; the emptiness check trims whitespace
/// but the substituted text does not alter the author's value.
pub fn script_description(node: &Handle) -> Option<String> {
    let desc = get_attr(node, DESCRIPTION_ATTR)?;
    if desc.trim().is_empty() {
        return None;
    }
    Some(desc)
}

/// The tag name of an element node, if it is one.
pub fn element_name(node: &Handle) -> Option<&str> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    // Walks to the first element with the given tag name.
    fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
        if element_name(node) == Some(tag) {
            return Some(node.clone());
        }
        for child in node.children.borrow().iter() {
            if let Some(found) = find_element(child, tag) {
                return Some(found);
            }
        }
        None
    }

    fn first_element(html: &str, tag: &str) -> Handle {
        let dom = parse_html(html.as_bytes()).expect("Parse failed");
        find_element(&dom.document, tag).expect("element not found")
    }

    #[test]
    fn test_retention_keep() {
        let div = first_element(r#"<div data-llm="keep">x</div>"#, "div");
        assert_eq!(retention(&div), Retention::Keep);
    }

    #[test]
    fn test_retention_drop() {
        let div = first_element(r#"<div data-llm="drop">x</div>"#, "div");
        assert_eq!(retention(&div), Retention::Drop);
    }

    #[test]
    fn test_retention_absent_or_unrecognized() {
        let plain = first_element("<div>x</div>", "div");
        assert_eq!(retention(&plain), Retention::Default);

        let odd = first_element(r#"<div data-llm="maybe">x</div>"#, "div");
        assert_eq!(retention(&odd), Retention::Default);
    }

    #[test]
    fn test_get_attr_first_match_wins() {
        // html5ever keeps the first occurrence of a duplicated attribute
        let a = first_element(r#"<a href="first" href="second">x</a>"#, "a");
        assert_eq!(get_attr(&a, "href"), Some("first".to_string()));
    }

    #[test]
    fn test_script_description_requires_non_blank() {
        let described = first_element(
            r#"<script data-llm-description="renders a chart"></script>"#,
            "script",
        );
        assert_eq!(
            script_description(&described),
            Some("renders a chart".to_string())
        );

        let blank = first_element(r#"<script data-llm-description="   "></script>"#, "script");
        assert_eq!(script_description(&blank), None);

        let missing = first_element("<script></script>", "script");
        assert_eq!(script_description(&missing), None);
    }

    #[test]
    fn test_script_description_preserves_raw_value() {
        let script = first_element(
            r#"<script data-llm-description=" padded analytics loader "></script>"#,
            "script",
        );
        assert_eq!(
            script_description(&script),
            Some(" padded analytics loader ".to_string())
        );
    }
}
