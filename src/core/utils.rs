//! Scanning helpers shared by the command and environment handlers
//!
//! Pure functions over text slices; none of them depend on the processing
//! context.

use std::fmt::Write;

use crate::data::constants::{BULLET, COMMAND_MARKER, ITEM_MARKER, SENTENCE_PUNCTUATION};

// =============================================================================
// Group matching
// =============================================================================

/// Byte offset of the `close` matching the `open` that starts `text`.
///
/// Depth starts at zero, so `text` must begin with `open`. A character
/// right after the command marker is escaped and never counted. Returns
/// `None` when the group never closes.
pub fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == COMMAND_MARKER {
            escaped = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Locate the `\end{name}` closing an environment whose opening tag has
/// already been consumed.
///
/// Only tags of the same name are counted, so `\begin{x}A\begin{x}B\end{x}C\end{x}`
/// is matched as one unit while other environments inside are ignored.
/// Returns the offsets of the start of the closing tag and of the first
/// byte after it.
pub fn find_matching_end(text: &str, name: &str) -> Option<(usize, usize)> {
    let open = format!("\\begin{{{}}}", name);
    let close = format!("\\end{{{}}}", name);
    let mut depth = 1usize;
    let mut pos = 0;

    loop {
        let next_close = pos + text[pos..].find(&close)?;
        match text[pos..].find(&open).map(|offset| pos + offset) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                pos = next_open + open.len();
            }
            _ => {
                depth -= 1;
                pos = next_close + close.len();
                if depth == 0 {
                    return Some((next_close, pos));
                }
            }
        }
    }
}

// =============================================================================
// Text helpers
// =============================================================================

/// Sentence punctuation ending a math body, if any
pub fn trailing_punctuation(body: &str) -> Option<char> {
    body.trim_end()
        .chars()
        .next_back()
        .filter(|c| SENTENCE_PUNCTUATION.contains(c))
}

/// Uppercase the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `text` starts with an `\item` marker (and not `\itemsep` and the like)
fn is_item_marker(text: &str) -> bool {
    text.strip_prefix(ITEM_MARKER)
        .map(|rest| !rest.starts_with(|c: char| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

/// Name inside the braces of a `\begin{` or `\end{` tag, given the text
/// right after the opening brace
fn tag_name(text: &str) -> Option<&str> {
    text.find('}').map(|end| text[..end].trim())
}

/// Replace every top-level `\item` of a list body with `1.`, `2.`, ... when
/// `ordered`, or with the bullet otherwise.
///
/// `is_list` tells which environment names are lists. Items of lists
/// nested inside the body are left alone; they are rewritten when the
/// nested list itself is scanned. Items inside any other environment
/// belong to this list.
pub fn rewrite_items(body: &str, ordered: bool, is_list: impl Fn(&str) -> bool) -> String {
    const BEGIN: &str = "\\begin{";
    const END: &str = "\\end{";

    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut counter = 0usize;
    let mut rest = body;

    while let Some(at) = rest.find(COMMAND_MARKER) {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];

        let consumed = if let Some(after) = tail.strip_prefix(BEGIN) {
            if tag_name(after).is_some_and(|name| is_list(name)) {
                depth += 1;
            }
            BEGIN.len()
        } else if let Some(after) = tail.strip_prefix(END) {
            if tag_name(after).is_some_and(|name| is_list(name)) {
                depth = depth.saturating_sub(1);
            }
            END.len()
        } else if tail.starts_with("\\\\") {
            2
        } else if depth == 0 && is_item_marker(tail) {
            counter += 1;
            if ordered {
                let _ = write!(out, "{}.", counter);
            } else {
                out.push_str(BULLET);
            }
            rest = &tail[ITEM_MARKER.len()..];
            continue;
        } else {
            1
        };

        out.push_str(&tail[..consumed]);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}
