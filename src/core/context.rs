//! Options and per-run processing state

use std::path::{Path, PathBuf};

use super::buffer::{BufferOrigin, BufferStack, CursorBuffer};
use super::output::OutputAccumulator;
use crate::data::constants::{DEFAULT_MAX_STACK_DEPTH, PLACEHOLDER};
use crate::features::registry::HandlerRegistry;
use crate::utils::error::{ConversionResult, ConversionWarning, GrammafyError};
use crate::utils::files::FileResolver;

// =============================================================================
// Options
// =============================================================================

/// Options for a grammafy run
#[derive(Debug, Clone)]
pub struct GrammafyOptions {
    /// Maximum number of nested buffers (inclusions, footnotes, list bodies)
    /// Default: 64
    pub max_stack_depth: usize,

    /// Fail when the document has no `\begin{document}`.
    /// When false the whole text is scanned and a warning is recorded.
    /// Default: true
    pub require_document_marker: bool,

    /// Splice in files named by `\input` and `\include`
    /// Default: true
    pub follow_includes: bool,

    /// Apply the whitespace and placeholder normalization passes
    /// Default: true
    pub post_process: bool,

    /// Directories tried, in order, when an included file is missing next
    /// to the document. Only used when reading from disk.
    /// Default: empty
    pub search_paths: Vec<PathBuf>,
}

impl Default for GrammafyOptions {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            require_document_marker: true,
            follow_includes: true,
            post_process: true,
            search_paths: Vec::new(),
        }
    }
}

impl GrammafyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept fragments without a `\begin{document}`
    pub fn lenient() -> Self {
        Self {
            require_document_marker: false,
            ..Self::default()
        }
    }

    /// Add a directory to [`GrammafyOptions::search_paths`]
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Lenient and without post-processing; output is the raw scan result
    pub fn raw() -> Self {
        Self {
            post_process: false,
            ..Self::lenient()
        }
    }
}

// =============================================================================
// Processing context
// =============================================================================

/// State of one run, handed to every handler.
///
/// Handlers read their arguments from the head buffer, advance past what
/// they consumed and append fragments to the output.
pub struct ProcessingContext<'a> {
    pub stack: BufferStack,
    pub output: OutputAccumulator,
    /// Name of the command or environment being resolved
    pub command: String,
    /// Directory inclusion paths are resolved against
    pub base_dir: PathBuf,
    pub warnings: Vec<ConversionWarning>,
    pub(crate) resolver: &'a dyn FileResolver,
    pub(crate) registry: &'a HandlerRegistry,
    pub(crate) options: &'a GrammafyOptions,
}

impl<'a> ProcessingContext<'a> {
    pub fn new(
        base_dir: impl AsRef<Path>,
        resolver: &'a dyn FileResolver,
        registry: &'a HandlerRegistry,
        options: &'a GrammafyOptions,
    ) -> Self {
        Self {
            stack: BufferStack::new(options.max_stack_depth),
            output: OutputAccumulator::new(),
            command: String::new(),
            base_dir: base_dir.as_ref().to_path_buf(),
            warnings: Vec::new(),
            resolver,
            registry,
            options,
        }
    }

    pub fn options(&self) -> &GrammafyOptions {
        self.options
    }

    pub fn head_mut(&mut self) -> ConversionResult<&mut CursorBuffer> {
        self.stack
            .head_mut()
            .ok_or_else(|| GrammafyError::internal("buffer stack is empty"))
    }

    /// Unread text of the head buffer
    pub fn remaining(&self) -> &str {
        self.stack.head().map(CursorBuffer::remaining).unwrap_or("")
    }

    pub fn starts_with(&self, c: char) -> bool {
        self.remaining().starts_with(c)
    }

    /// Offset of `literal` from the head's read position
    pub fn find(&self, literal: &str) -> Option<usize> {
        self.stack.head().and_then(|head| head.find(literal))
    }

    /// Like [`ProcessingContext::find`], but a miss is an unterminated delimiter
    pub fn expect(&self, literal: &str) -> ConversionResult<usize> {
        self.find(literal)
            .ok_or_else(|| self.unterminated(literal))
    }

    pub fn advance(&mut self, n: usize) {
        if let Some(head) = self.stack.head_mut() {
            head.advance(n);
        }
    }

    pub fn advance_char(&mut self) {
        if let Some(head) = self.stack.head_mut() {
            head.advance_char();
        }
    }

    /// Advance the head past the next `literal`
    pub fn seek_past(&mut self, literal: &str) -> ConversionResult<()> {
        let result = self.head_mut()?.seek_past(literal);
        result.map_err(|missing| self.unterminated(&missing.0))
    }

    /// Move the head to an absolute position; moving backwards exhausts the
    /// head and records a warning
    pub fn jump_to(&mut self, target: usize) -> ConversionResult<()> {
        let head = self.head_mut()?;
        let line = head.line_number();
        let Err(fault) = head.jump_to(target) else {
            return Ok(());
        };

        let origin = head.origin().to_string();
        tracing::warn!(
            from = fault.from,
            to = fault.to,
            %origin,
            "backward_cursor_fault"
        );
        self.warn(
            ConversionWarning::new(format!(
                "read position in {} moved backwards from {} to {}; skipped the rest of it",
                origin, fault.from, fault.to
            ))
            .at_line(line),
        );
        Ok(())
    }

    pub fn emit(&mut self, text: &str) {
        self.output.append(text);
    }

    pub fn emit_placeholder(&mut self) {
        self.output.append(PLACEHOLDER);
    }

    pub fn record_unknown(&mut self, name: impl Into<String>) {
        self.output.record_unknown(name);
    }

    /// Push text to be scanned before the rest of the current head
    pub fn push_text(&mut self, text: &str, origin: BufferOrigin) -> ConversionResult<()> {
        self.stack.push(CursorBuffer::new(text, origin))
    }

    /// Record a warning, located at the head's read position unless it
    /// already names a line
    pub fn warn(&mut self, mut warning: ConversionWarning) {
        if warning.line.is_none() {
            warning.line = self.stack.head().map(CursorBuffer::line_number);
        }
        self.warnings.push(warning);
    }

    /// Name of the buffer being read, for error messages
    pub fn source_label(&self) -> String {
        self.stack
            .head()
            .map(|head| head.origin().to_string())
            .unwrap_or_else(|| "<empty>".to_string())
    }

    /// Error for a closing `delimiter` missing from the head buffer
    pub fn unterminated(&self, delimiter: &str) -> GrammafyError {
        let line = self.stack.head().map(CursorBuffer::line_number).unwrap_or(0);
        GrammafyError::unterminated(delimiter, self.source_label(), line)
    }
}
