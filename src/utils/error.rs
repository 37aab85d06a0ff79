//! Error handling for grammafy runs
//!
//! Fatal conditions abort the current document and surface as
//! [`GrammafyError`]. Recoverable ones are collected as
//! [`ConversionWarning`] and returned next to the cleaned text.

use fxhash::FxHashSet;
use std::fmt;
use std::path::PathBuf;

/// Fatal error raised while processing a document
#[derive(Debug, Clone)]
pub enum GrammafyError {
    /// A file named by `\input` or `\include` could not be read
    MissingInclude {
        path: PathBuf,
        included_from: String,
        reason: String,
    },
    /// A closing delimiter was searched for but never found
    UnterminatedDelimiter {
        delimiter: String,
        source: String,
        line: usize,
    },
    /// The document has no `\begin{document}`
    MissingPreambleMarker { source: String },
    /// Too many nested buffers (inclusions, footnotes, list bodies)
    StackDepthExceeded { limit: usize, source: String },
    /// A file includes itself, directly or through other files
    IncludeCycle { path: PathBuf },
    /// A custom rules file could not be parsed
    InvalidRules { message: String },
    /// IO error (for file operations)
    IoError { message: String },
    /// Internal error
    InternalError { message: String },
}

impl fmt::Display for GrammafyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammafyError::MissingInclude {
                path,
                included_from,
                reason,
            } => write!(
                f,
                "Cannot include '{}' (from {}): {}",
                path.display(),
                included_from,
                reason
            ),
            GrammafyError::UnterminatedDelimiter {
                delimiter,
                source,
                line,
            } => write!(
                f,
                "Unterminated delimiter in {} near line {}: expected '{}'",
                source, line, delimiter
            ),
            GrammafyError::MissingPreambleMarker { source } => {
                write!(f, "No \\begin{{document}} found in {}", source)
            }
            GrammafyError::StackDepthExceeded { limit, source } => write!(
                f,
                "Nesting deeper than {} buffers while processing {}",
                limit, source
            ),
            GrammafyError::IncludeCycle { path } => {
                write!(f, "Include cycle: '{}' includes itself", path.display())
            }
            GrammafyError::InvalidRules { message } => {
                write!(f, "Invalid rules: {}", message)
            }
            GrammafyError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
            GrammafyError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for GrammafyError {}

impl From<std::io::Error> for GrammafyError {
    fn from(err: std::io::Error) -> Self {
        GrammafyError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for grammafy operations
pub type ConversionResult<T> = Result<T, GrammafyError>;

// Convenience constructors for errors
impl GrammafyError {
    pub fn unterminated(delimiter: impl Into<String>, source: impl Into<String>, line: usize) -> Self {
        GrammafyError::UnterminatedDelimiter {
            delimiter: delimiter.into(),
            source: source.into(),
            line,
        }
    }

    pub fn missing_include(
        path: impl Into<PathBuf>,
        included_from: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GrammafyError::MissingInclude {
            path: path.into(),
            included_from: included_from.into(),
            reason: reason.into(),
        }
    }

    pub fn rules(message: impl Into<String>) -> Self {
        GrammafyError::InvalidRules {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GrammafyError::InternalError {
            message: message.into(),
        }
    }

    /// Whether the error is caused by the document rather than the environment
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            GrammafyError::UnterminatedDelimiter { .. }
                | GrammafyError::MissingPreambleMarker { .. }
                | GrammafyError::IncludeCycle { .. }
        )
    }
}

/// Non-fatal issue noticed during a run
#[derive(Debug, Clone)]
pub struct ConversionWarning {
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Default)]
pub struct GrammafyOutput {
    /// Cleaned prose
    pub text: String,
    /// Commands and environments nobody knew how to handle
    pub unknown: FxHashSet<String>,
    /// Recoverable problems noticed along the way
    pub warnings: Vec<ConversionWarning>,
}

impl GrammafyOutput {
    pub fn new(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_unknowns(&self) -> bool {
        !self.unknown.is_empty()
    }

    /// Unknown names in alphabetical order, for reports
    pub fn sorted_unknowns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.unknown.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
