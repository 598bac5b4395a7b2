//! Tree-mutating cleanup passes
//!
//! These passes run before re-serialization in the structural-cleanup
//! pipeline: script-description substitution first (so the information
//! survives stripping), then image substitution, then element stripping.
//!
//! All three walk depth-first and follow the same mutation discipline:
//! per parent, decisions are collected under an immutable borrow of the
//! child list, then applied under a mutable borrow, then recursion
//! continues into the survivors. Removing or replacing children while
//! iterating the live list is never done.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, Node, NodeData};

use crate::annotations::{
    Retention, SCRIPT_DESCRIPTION_PREFIX, element_name, get_attr, retention, script_description,
};

/// Replace described scripts with a text node reading
/// `"Javascript description: <value>"`.
///
/// Scripts annotated `keep` are preserved untouched; scripts annotated
/// `drop` or lacking a usable description are left in place for
/// [`strip_elements`] to remove.
pub fn substitute_scripts(root: &Handle) {
    let mut replacements: Vec<(usize, String)> = Vec::new();
    let mut to_recurse: Vec<Handle> = Vec::new();

    {
        let children = root.children.borrow();
        for (idx, child) in children.iter().enumerate() {
            if element_name(child) == Some("script") {
                match retention(child) {
                    Retention::Keep | Retention::Drop => continue,
                    Retention::Default => {
                        if let Some(desc) = script_description(child) {
                            replacements
                                .push((idx, format!("{SCRIPT_DESCRIPTION_PREFIX}{desc}")));
                        }
                    }
                }
            } else {
                to_recurse.push(child.clone());
            }
        }
    }

    replace_children(root, replacements);

    for child in &to_recurse {
        substitute_scripts(child);
    }
}

/// Replace images with their alt-text placeholder.
///
/// `"[Image: alt]"` when alt text is present, `"[Image]"` when it is
/// missing or empty, or full removal of alt-less images when
/// `remove_if_no_alt` is set. Images annotated `drop` are left for
/// [`strip_elements`].
pub fn substitute_images(root: &Handle, remove_if_no_alt: bool) {
    let mut replacements: Vec<(usize, String)> = Vec::new();
    let mut removals: Vec<usize> = Vec::new();
    let mut to_recurse: Vec<Handle> = Vec::new();

    {
        let children = root.children.borrow();
        for (idx, child) in children.iter().enumerate() {
            if element_name(child) == Some("img") {
                if retention(child) == Retention::Drop {
                    continue;
                }
                let alt = get_attr(child, "alt").unwrap_or_default();
                if alt.is_empty() {
                    if remove_if_no_alt {
                        removals.push(idx);
                    } else {
                        replacements.push((idx, "[Image]".to_string()));
                    }
                } else {
                    replacements.push((idx, format!("[Image: {alt}]")));
                }
            } else {
                to_recurse.push(child.clone());
            }
        }
    }

    // Replacements keep indices stable; removals must come after, highest
    // index first.
    replace_children(root, replacements);
    {
        let mut children = root.children.borrow_mut();
        for idx in removals.iter().rev() {
            children.remove(*idx);
        }
    }

    for child in &to_recurse {
        substitute_images(child, remove_if_no_alt);
    }
}

/// Remove every element whose tag is in the strip set, honoring retention
/// directives.
///
/// An element annotated `keep` survives even when its tag is in the set,
/// and its subtree is still traversed so that nested `drop` directives
/// apply. An element annotated `drop` is removed regardless of tag. A node
/// both in the strip set and annotated `drop` is removed exactly once.
pub fn strip_elements(root: &Handle, strip_set: &HashSet<&str>) {
    let mut to_remove: Vec<usize> = Vec::new();
    let mut to_recurse: Vec<Handle> = Vec::new();

    {
        let children = root.children.borrow();
        for (idx, child) in children.iter().enumerate() {
            let remove = match retention(child) {
                Retention::Drop => true,
                Retention::Keep => false,
                Retention::Default => element_name(child)
                    .map(|tag| strip_set.contains(tag))
                    .unwrap_or(false),
            };
            if remove {
                to_remove.push(idx);
            } else {
                to_recurse.push(child.clone());
            }
        }
    }

    {
        let mut children = root.children.borrow_mut();
        for idx in to_remove.iter().rev() {
            children.remove(*idx);
        }
    }

    for child in &to_recurse {
        strip_elements(child, strip_set);
    }
}

fn replace_children(parent: &Handle, replacements: Vec<(usize, String)>) {
    if replacements.is_empty() {
        return;
    }
    let mut children = parent.children.borrow_mut();
    for (idx, text) in replacements {
        let node = Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from(text.as_str())),
        });
        node.parent.set(Some(Rc::downgrade(parent)));
        children[idx] = node;
    }
}
