//! Output accumulator
//!
//! Fragments are collected in order and joined once after the scan.

use fxhash::FxHashSet;

#[derive(Debug, Default)]
pub struct OutputAccumulator {
    fragments: Vec<String>,
    unknown: FxHashSet<String>,
}

impl OutputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.fragments.push(text);
        }
    }

    /// Join all fragments. The joined text replaces the fragment list, so
    /// repeated calls do not join again.
    pub fn assembled_text(&mut self) -> &str {
        if self.fragments.len() > 1 {
            let joined = self.fragments.concat();
            self.fragments = vec![joined];
        }
        self.fragments.first().map(String::as_str).unwrap_or("")
    }

    pub fn replace_assembled_text(&mut self, text: String) {
        self.fragments = vec![text];
    }

    pub fn record_unknown(&mut self, name: impl Into<String>) {
        self.unknown.insert(name.into());
    }

    pub fn unknown(&self) -> &FxHashSet<String> {
        &self.unknown
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Consume the accumulator into the assembled text and the unknown set
    pub fn into_parts(mut self) -> (String, FxHashSet<String>) {
        self.assembled_text();
        let text = self.fragments.pop().unwrap_or_default();
        (text, self.unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembled_in_order() {
        let mut out = OutputAccumulator::new();
        out.append("one ");
        out.append(String::from("two "));
        out.append("");
        out.append("three");
        assert_eq!(out.fragment_count(), 3);
        assert_eq!(out.assembled_text(), "one two three");
        assert_eq!(out.fragment_count(), 1);
    }

    #[test]
    fn test_replace_assembled_text() {
        let mut out = OutputAccumulator::new();
        out.append("raw  text");
        out.replace_assembled_text("raw text".to_string());
        assert_eq!(out.assembled_text(), "raw text");
    }

    #[test]
    fn test_unknown_names_are_unique() {
        let mut out = OutputAccumulator::new();
        out.record_unknown("foo");
        out.record_unknown("foo");
        out.record_unknown("begin{bar}");
        assert_eq!(out.unknown().len(), 2);

        let (text, unknown) = out.into_parts();
        assert_eq!(text, "");
        assert!(unknown.contains("begin{bar}"));
    }
}
