//! Normalization passes applied once to the assembled output
//!
//! The passes run in a fixed order; later passes rely on the whitespace
//! already collapsed by earlier ones. Passes that can expose new matches
//! after a replacement are repeated until nothing changes, which makes the
//! whole pipeline idempotent.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::data::constants::{BULLET, PLACEHOLDER};

lazy_static! {
    static ref SPACES_AROUND_NEWLINE: Regex = Regex::new(r"[ ]*\n[ ]*").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n\n\s*").unwrap();
    static ref SPACE_RUNS: Regex = Regex::new(r" +").unwrap();
    static ref BEFORE_PLACEHOLDER: Regex = Regex::new(r"(\S)(\n?)\[_\]").unwrap();
    static ref AFTER_PLACEHOLDER: Regex = Regex::new(r"\[_\]([.,;]?)\n(\S)").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^(?:\d+\.|-)").unwrap();
}

/// Run every pass over `text`
pub fn post_process(text: &str) -> String {
    let text = strip_trailing_whitespace(text);
    let text = remove_empty_pairs(&text.replace('\t', " "));
    let text = SPACES_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = space_placeholders(&text);
    text.trim().to_string()
}

/// Trim the text and the end of every line. Line breaks come out as `\n`.
fn strip_trailing_whitespace(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove `[]` and `()`, including pairs that only become empty once an
/// inner pair is gone
fn remove_empty_pairs(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = current.replace("[]", "").replace("()", "");
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Put exactly one space between the placeholder and the word before it,
/// and join a line starting right after a placeholder to it. Bullets and
/// list numbers are left where they are.
fn space_placeholders(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let spaced = BEFORE_PLACEHOLDER
            .replace_all(&current, |caps: &Captures<'_>| {
                if caps[2].is_empty() && &caps[1] == BULLET {
                    caps[0].to_string()
                } else {
                    format!("{} {}", &caps[1], PLACEHOLDER)
                }
            })
            .into_owned();

        let joined = AFTER_PLACEHOLDER
            .replace_all(&spaced, |caps: &Captures<'_>| {
                let next_line = caps
                    .get(2)
                    .map(|m| &spaced[m.start()..])
                    .unwrap_or("");
                if LIST_MARKER.is_match(next_line) {
                    caps[0].to_string()
                } else {
                    format!("{}{} {}", PLACEHOLDER, &caps[1], &caps[2])
                }
            })
            .into_owned();

        if joined == current {
            return joined;
        }
        current = joined;
    }
}
