//! Post-render condensation
//!
//! The renderer's raw output still carries noise that costs tokens without
//! carrying meaning: attribution lines, list markup fragmented across
//! lines by the source renderer, and runs of blank lines. Condensation is
//! line-oriented and runs in a fixed order:
//!
//! 1. Drop lines whose lowercased trimmed content contains a noise
//!    substring (photo credits, copyright, source attributions); blank
//!    lines are not noise
//! 2. Repair fragmented numbered lists: a line that is only a one-or-two
//!    digit number, followed (blank lines skipped) by content lines up to
//!    the next standalone number or heading, becomes `"N. part1 - part2"`
//! 3. Collapse three or more consecutive newlines to exactly two
//! 4. Strip trailing horizontal whitespace from every line
//! 5. Trim the document
//!
//! The pass is idempotent: condensing already-condensed text changes
//! nothing. Repaired list lines are never standalone numbers, removed
//! noise cannot reappear, and the join separator cannot assemble a noise
//! substring across parts.

use regex::Regex;
use std::sync::OnceLock;

/// Noise substrings that disqualify a line (matched case-insensitively)
const NOISE_PATTERNS: [&str; 6] = [
    "photo by",
    "credit:",
    "source:",
    "\u{a9}",
    "copyright",
    "all rights reserved",
];

fn multiple_newlines() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").ok()).as_ref()
}

/// Condense Markdown text for minimal token count.
///
/// Exposed standalone so callers can re-condense text that did not come
/// from this crate's renderer. Idempotent.
///
/// # Examples
///
/// ```rust
/// use markdown_condenser::condense::condense;
///
/// let text = "Content\n\nPhoto by Someone\n\nMore content";
/// let condensed = condense(text);
/// assert!(!condensed.contains("Photo by"));
/// assert!(condensed.contains("More content"));
/// ```
pub fn condense(md: &str) -> String {
    let lines: Vec<&str> = md.split('\n').collect();
    let lines = remove_noise_lines(&lines);
    let lines = fix_fragmented_lists(&lines);

    let mut md = lines.join("\n");
    if let Some(re) = multiple_newlines() {
        md = re.replace_all(&md, "\n\n").into_owned();
    }

    let stripped: Vec<&str> = md
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect();

    stripped.join("\n").trim().to_string()
}

/// Drop attribution and boilerplate lines; blank lines pass through.
fn remove_noise_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .filter(|line| {
            let lower = line.trim().to_lowercase();
            if lower.is_empty() {
                return true;
            }
            !NOISE_PATTERNS.iter().any(|pattern| lower.contains(pattern))
        })
        .copied()
        .collect()
}

/// A line that is nothing but a one-or-two digit number
fn is_standalone_number(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rejoin list numbers that the source renderer split from their content.
///
/// A standalone number collects the following non-empty, non-heading lines
/// (blank lines skipped) until the next standalone number or heading, and
/// the group is rewritten as one list item. A number with nothing to
/// collect is left alone.
fn fix_fragmented_lists(lines: &[&str]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if is_standalone_number(trimmed) {
            let num = trimmed;
            i += 1;

            while i < lines.len() && lines[i].trim().is_empty() {
                i += 1;
            }

            let mut parts: Vec<&str> = Vec::new();
            while i < lines.len() {
                let next = lines[i].trim();
                if next.is_empty() {
                    // Look past the blank run: a following number or
                    // heading ends this item
                    let mut j = i + 1;
                    while j < lines.len() && lines[j].trim().is_empty() {
                        j += 1;
                    }
                    if j < lines.len() {
                        let peek = lines[j].trim();
                        if is_standalone_number(peek) || peek.starts_with('#') {
                            break;
                        }
                    } else {
                        break;
                    }
                    i += 1;
                    continue;
                }
                if is_standalone_number(next) || next.starts_with('#') {
                    break;
                }
                parts.push(next);
                i += 1;
            }

            if parts.is_empty() {
                result.push(line.to_string());
            } else {
                result.push(format!("{}. {}", num, parts.join(" - ")));
            }
            continue;
        }

        result.push(line.to_string());
        i += 1;
    }

    result
}
