//! Output artifacts derived from a run
//!
//! A processed `thesis.tex` produces `thesis_grammafied.txt` and, when some
//! commands were not recognised, `thesis_unknowns.txt`.

use std::path::{Path, PathBuf};

use crate::data::constants::DOCUMENT_EXTENSION;
use crate::utils::error::GrammafyOutput;

const CLEANED_SUFFIX: &str = "_grammafied.txt";
const UNKNOWNS_SUFFIX: &str = "_unknowns.txt";
const UNKNOWNS_HEADER: &str = "Unknown LaTeX commands encountered:";

/// Paths of the files written for one input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cleaned: PathBuf,
    pub unknowns: PathBuf,
}

impl OutputPaths {
    /// Output files next to `output_dir`, named after the input file.
    ///
    /// `.tex` inputs lose their extension; other inputs keep their full name.
    pub fn for_input(input: &Path, output_dir: &Path) -> Self {
        let base = base_name(input);
        Self {
            cleaned: output_dir.join(format!("{}{}", base, CLEANED_SUFFIX)),
            unknowns: output_dir.join(format!("{}{}", base, UNKNOWNS_SUFFIX)),
        }
    }
}

fn base_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    match name.strip_suffix(DOCUMENT_EXTENSION) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Human-readable listing of the unknown set, or `None` when it is empty
pub fn format_unknowns(output: &GrammafyOutput) -> Option<String> {
    if !output.has_unknowns() {
        return None;
    }

    let mut report = String::new();
    report.push_str(UNKNOWNS_HEADER);
    report.push_str("\n\n");
    for name in output.sorted_unknowns() {
        report.push_str("  \\");
        report.push_str(name);
        report.push('\n');
    }
    Some(report)
}
