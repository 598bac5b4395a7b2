//! Markdown converter - transforms DOM tree to Markdown
//!
//! The converter walks the DOM once, depth-first in document order, and
//! emits condensed Markdown as it goes. Dispatch per element follows a
//! fixed priority:
//!
//! 1. A `data-llm="drop"` directive skips the node and its subtree
//! 2. A tag in the effective strip set is skipped unless annotated
//!    `data-llm="keep"`; stripped scripts still emit their
//!    `data-llm-description` line so the information survives
//! 3. A small fixed set of tags with no text representation (`canvas`,
//!    `embed`, `object`, `param`, `wbr`) emits nothing and does not recurse
//! 4. Wrap rules: prefix + children + suffix (headings, paragraphs,
//!    inline formatting, table delimiters, description lists, ...)
//! 5. Structural pass-through tags recurse with no added markup
//! 6. Special cases that need state or attributes: line breaks, rules,
//!    code, preformatted blocks, anchors, lists, list items, media
//! 7. Anything unrecognized recurses with no added markup
//!
//! The walker carries the rendering state across the recursion: an
//! append-only output buffer, a preformatted-mode flag, the list nesting
//! depth, a per-level ordered/unordered stack, and per-depth ordered-list
//! counters. The counter vector grows with depth, so ordered nesting has
//! no fixed ceiling. Rendering is total: it always terminates on the
//! parser's finite tree and produces output for whatever shape it is
//! handed.
//!
//! Output text is condensed (noise lines removed, fragmented lists
//! repaired, whitespace normalized) before being returned; see
//! [`crate::condense`].

use std::collections::HashSet;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::annotations::{
    Retention, SCRIPT_DESCRIPTION_PREFIX, get_attr, retention, script_description,
};
use crate::condense::condense;
use crate::options::StripConfig;

/// A fixed prefix/suffix pair wrapped around an element's children
struct WrapRule {
    prefix: &'static str,
    suffix: &'static str,
}

const fn rule(prefix: &'static str, suffix: &'static str) -> WrapRule {
    WrapRule { prefix, suffix }
}

/// Rendering rule for tags that are a pure wrap around their children.
///
/// Inline rules carry surrounding spaces so adjacent trimmed text nodes
/// stay separated.
fn wrap_rule(tag: &str) -> Option<WrapRule> {
    let rule = match tag {
        // Headings
        "h1" => rule("\n# ", "\n\n"),
        "h2" => rule("\n## ", "\n\n"),
        "h3" => rule("\n### ", "\n\n"),
        "h4" => rule("\n#### ", "\n\n"),
        "h5" => rule("\n##### ", "\n\n"),
        "h6" => rule("\n###### ", "\n\n"),

        // Block elements
        "p" => rule("", "\n\n"),
        "blockquote" | "address" => rule("\n> ", "\n\n"),

        // Inline formatting
        "strong" | "b" => rule(" **", "** "),
        "em" | "i" => rule(" *", "* "),
        "u" => rule(" _", "_ "),
        "s" | "del" => rule(" ~~", "~~ "),
        "ins" => rule(" __", "__ "),
        "mark" => rule(" ==", "== "),
        "small" => rule(" ", " "),
        "sub" => rule("~", "~"),
        "sup" => rule("^", "^"),
        "q" => rule(" \"", "\" "),

        // Code-adjacent inline tags
        "kbd" | "samp" => rule(" `", "` "),
        "var" => rule(" _", "_ "),
        "dfn" | "cite" => rule(" *", "* "),
        "abbr" => rule("", ""),

        // Table elements
        "table" => rule("\n", "\n"),
        "tr" => rule("|", "\n"),
        "th" => rule(" **", "** |"),
        "td" => rule(" ", " |"),
        "caption" => rule("\n*", "*\n"),

        // Description lists
        "dl" => rule("\n", "\n"),
        "dt" => rule("\n**", "**\n"),
        "dd" => rule(": ", "\n"),

        // Details/summary
        "details" => rule("\n", "\n"),
        "summary" => rule("\n**", "**\n"),

        "time" => rule("", ""),

        // Ruby annotations
        "ruby" | "rp" => rule("", ""),
        "rt" => rule(" (", ")"),

        _ => return None,
    };
    Some(rule)
}

/// Structural tags that contribute no markup of their own but may contain
/// meaningful nested text (including form controls, which have no Markdown
/// representation).
fn is_pass_through(tag: &str) -> bool {
    matches!(
        tag,
        // Document structure
        "html" | "head" | "body"
            // Sectioning
            | "div" | "section" | "article" | "main"
            | "header" | "footer" | "aside" | "nav"
            | "hgroup" | "search"
            // Grouping
            | "span" | "figure" | "figcaption"
            // Forms
            | "form" | "fieldset" | "legend"
            | "label" | "input" | "button"
            | "select" | "optgroup" | "option"
            | "textarea" | "output" | "datalist"
            | "meter" | "progress"
            // Table grouping
            | "thead" | "tbody" | "tfoot"
            | "colgroup" | "col"
            // Media containers
            | "picture" | "source" | "track"
            | "map" | "area"
            // Metadata
            | "meta" | "title" | "link" | "base"
            // Text direction
            | "bdi" | "bdo"
            | "template"
            | "data"
            | "dialog"
            // Deprecated but may appear
            | "center" | "font" | "big" | "tt"
            | "strike" | "acronym" | "dir"
    )
}

/// Tags with no meaningful text representation at all: no output, no
/// recursion.
fn is_skipped(tag: &str) -> bool {
    matches!(tag, "canvas" | "embed" | "object" | "param" | "wbr")
}

/// Main Markdown converter
///
/// Stateless between calls: each conversion owns its own walker state, so
/// one converter can serve concurrent invocations over distinct trees.
///
/// # Usage
///
/// ```rust
/// use markdown_condenser::converter::MarkdownConverter;
/// use markdown_condenser::parser::parse_html;
///
/// let dom = parse_html(b"<h1>Title</h1><p>Content</p>").expect("Parse failed");
/// let markdown = MarkdownConverter::new().convert(&dom);
/// assert!(markdown.contains("# Title"));
/// ```
pub struct MarkdownConverter {
    config: StripConfig,
}

impl MarkdownConverter {
    /// Create a converter with the default strip configuration
    pub fn new() -> Self {
        Self {
            config: StripConfig::default(),
        }
    }

    /// Create a converter with a custom strip configuration
    pub fn with_config(config: StripConfig) -> Self {
        Self { config }
    }

    /// Convert a parsed DOM tree to condensed Markdown.
    ///
    /// Total over any tree shape: unrecognized tags recurse, missing
    /// attributes degrade to empty strings, and node types outside
    /// document/element/text are ignored.
    pub fn convert(&self, dom: &RcDom) -> String {
        let strip_set = self.config.effective_strip_set();
        let mut renderer = Renderer {
            out: String::with_capacity(1024),
            strip_set: &strip_set,
            remove_images_no_alt: self.config.remove_images_no_alt,
            in_pre: false,
            list_depth: 0,
            ordered: Vec::new(),
            counters: Vec::new(),
        };
        renderer.walk(&dom.document);
        condense(&renderer.out)
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-invocation rendering state
struct Renderer<'a> {
    out: String,
    strip_set: &'a HashSet<&'a str>,
    remove_images_no_alt: bool,
    in_pre: bool,
    /// Current list nesting depth (1 = inside the outermost list)
    list_depth: usize,
    /// Whether each open list level is ordered
    ordered: Vec<bool>,
    /// Ordered-list item counters, indexed by depth - 1; grows on demand
    counters: Vec<u32>,
}

impl Renderer<'_> {
    fn walk(&mut self, node: &Handle) {
        match node.data {
            NodeData::Document => self.children(node),
            NodeData::Element { ref name, .. } => self.render_element(node, name.local.as_ref()),
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                self.render_text(&text);
            }
            // Comments, doctypes and processing instructions have no
            // Markdown representation.
            _ => {}
        }
    }

    fn render_text(&mut self, text: &str) {
        if self.in_pre {
            self.out.push_str(text);
            return;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.out.push_str(&trimmed.replace('\n', " "));
    }

    fn render_element(&mut self, node: &Handle, tag: &str) {
        let directive = retention(node);
        if directive == Retention::Drop {
            return;
        }

        if self.strip_set.contains(tag) && directive != Retention::Keep {
            // Described scripts leave a trace; everything else in the strip
            // set vanishes with its subtree.
            if tag == "script"
                && let Some(desc) = script_description(node)
            {
                self.out.push('\n');
                self.out.push_str(SCRIPT_DESCRIPTION_PREFIX);
                self.out.push_str(&desc);
                self.out.push('\n');
            }
            return;
        }

        if is_skipped(tag) {
            return;
        }

        if let Some(rule) = wrap_rule(tag) {
            self.out.push_str(rule.prefix);
            self.children(node);
            self.out.push_str(rule.suffix);
            return;
        }

        if is_pass_through(tag) {
            self.children(node);
            return;
        }

        match tag {
            "br" => self.out.push('\n'),
            "hr" => self.out.push_str("\n---\n\n"),
            "code" => self.render_code(node),
            "pre" => self.render_pre(node),
            "a" => self.render_link(node),
            "img" => self.render_image(node),
            // menu is an unordered list in everything but name
            "ul" | "menu" => self.render_list(node, false),
            "ol" => self.render_list(node, true),
            "li" => self.render_list_item(node),
            "audio" | "video" => self.render_media(node, tag),
            // Unrecognized tags degrade to their children
            _ => self.children(node),
        }
    }

    fn render_code(&mut self, node: &Handle) {
        if self.in_pre {
            self.children(node);
        } else {
            self.out.push('`');
            self.children(node);
            self.out.push('`');
        }
    }

    fn render_pre(&mut self, node: &Handle) {
        self.out.push_str("\n```\n");
        self.in_pre = true;
        self.children(node);
        self.in_pre = false;
        self.out.push_str("\n```\n\n");
    }

    fn render_link(&mut self, node: &Handle) {
        self.out.push('[');
        self.children(node);
        self.out.push_str("](");
        // href is emitted verbatim; URL policy belongs to the caller
        self.out.push_str(&get_attr(node, "href").unwrap_or_default());
        self.out.push(')');
    }

    fn render_image(&mut self, node: &Handle) {
        let alt = get_attr(node, "alt").unwrap_or_default();
        if alt.is_empty() {
            if !self.remove_images_no_alt {
                self.out.push_str("[Image]");
            }
        } else {
            self.out.push_str("[Image: ");
            self.out.push_str(&alt);
            self.out.push(']');
        }
    }

    fn render_media(&mut self, node: &Handle, tag: &str) {
        let label = if tag == "audio" { "Audio" } else { "Video" };
        match get_attr(node, "src") {
            Some(src) if !src.is_empty() => {
                self.out.push('[');
                self.out.push_str(label);
                self.out.push_str(": ");
                self.out.push_str(&src);
                self.out.push(']');
            }
            _ => {
                self.out.push('[');
                self.out.push_str(label);
                self.out.push(']');
            }
        }
        // Fallback text and nested source hints still render
        self.children(node);
    }

    fn render_list(&mut self, node: &Handle, ordered: bool) {
        self.out.push('\n');
        self.list_depth += 1;
        self.ordered.push(ordered);
        if ordered {
            if self.counters.len() < self.list_depth {
                self.counters.resize(self.list_depth, 0);
            }
            // A new container restarts numbering at this depth
            self.counters[self.list_depth - 1] = 0;
        }
        self.children(node);
        self.ordered.pop();
        self.list_depth -= 1;
        self.out.push('\n');
    }

    fn render_list_item(&mut self, node: &Handle) {
        for _ in 0..self.list_depth.saturating_sub(1) {
            self.out.push_str("  ");
        }
        if self.ordered.last().copied().unwrap_or(false) {
            let depth = self.list_depth - 1;
            self.counters[depth] += 1;
            self.out.push_str(&self.counters[depth].to_string());
            self.out.push_str(". ");
        } else {
            // Also the fallback for a stray li outside any list container
            self.out.push_str("- ");
        }
        self.children(node);
        self.out.push('\n');
    }

    fn children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.walk(child);
        }
    }
}
