//! # grammafy
//!
//! Turn LaTeX documents into plain prose that grammar checkers can read.
//!
//! ## Features
//!
//! - **Single pass**: a character scanner over a stack of text buffers, no AST
//! - **Placeholders**: mathematics, references and floats become `[_]`,
//!   keeping the sentence punctuation that followed them
//! - **Structure kept**: theorem-like environments get a title, lists are
//!   numbered or bulleted, footnotes are inlined
//! - **Inclusions**: `\input` and `\include` are followed recursively
//! - **Extensible**: user commands and environments through
//!   [`HandlerRegistry`] or a TOML rules file
//! - **Unknown report**: every command the converter did not recognise is
//!   collected for review
//!
//! ## Usage Examples
//!
//! ### Converting a document
//!
//! ```rust
//! use grammafy::process;
//!
//! let output = process(r#"
//!     \documentclass{article}
//!     \begin{document}
//!     \section{Introduction}
//!     Let $x$ be positive\footnote{See \cite{knuth}.}.
//!     \end{document}
//! "#, ".").unwrap();
//!
//! assert_eq!(output.text, "Introduction\nLet [_] be positive(FOOTNOTE: See [_].).");
//! assert!(output.unknown.is_empty());
//! ```
//!
//! ### Registering commands
//!
//! ```rust
//! use grammafy::{CommandKind, Grammafier, GrammafyOptions, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_command("citealp", CommandKind::Reference);
//!
//! let mut grammafier = Grammafier::with_registry(registry);
//! *grammafier.options_mut() = GrammafyOptions::lenient();
//!
//! let output = grammafier.process(r"as shown by \citealp{lamport}", ".").unwrap();
//! assert_eq!(output.text, "as shown by [_]");
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Feature modules - extension registry and rule files
pub mod features;

/// Utility modules
pub mod utils;

use std::path::Path;

// Re-export the engine
pub use core::{Grammafier, GrammafyOptions, ProcessingContext};

// Re-export feature modules
pub use features::registry::{CommandKind, EnvironmentKind, HandlerFn, HandlerRegistry};
#[cfg(feature = "custom-rules")]
pub use features::rules::CustomRules;

// Re-export utilities
pub use utils::error::{ConversionResult, ConversionWarning, GrammafyError, GrammafyOutput};
pub use utils::files::{FileResolver, MemoryFileResolver, StdFileResolver};

/// Convert a LaTeX document with default options.
///
/// Inclusions are resolved against `base_dir`.
pub fn process(text: &str, base_dir: impl AsRef<Path>) -> ConversionResult<GrammafyOutput> {
    Grammafier::new().process(text, base_dir)
}

/// Read and convert a LaTeX document with default options
pub fn process_file(path: impl AsRef<Path>) -> ConversionResult<GrammafyOutput> {
    Grammafier::new().process_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_minimal_document() {
        let output = process("\\begin{document}Hello, world!\\end{document}", ".").unwrap();
        assert_eq!(output.text, "Hello, world!");
    }

    #[test]
    fn test_process_reports_unknowns() {
        let output = process("\\begin{document}A \\weird{x} B\\end{document}", ".").unwrap();
        assert_eq!(output.text, "A B");
        assert_eq!(output.sorted_unknowns(), vec!["weird"]);
    }

    #[test]
    fn test_process_file_missing() {
        let err = process_file("/definitely/not/here.tex").unwrap_err();
        assert!(matches!(err, GrammafyError::IoError { .. }));
    }
}
