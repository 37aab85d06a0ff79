//! The scan loop and the public entry points
//!
//! Text between delimiters is copied to the output unchanged; each
//! delimiter hands control to a handler which consumes its own arguments.
//! The scan ends when the buffer stack is empty, either because every
//! buffer was read to the end or because `\end{document}` cleared it.

use std::fs;
use std::path::Path;

use super::buffer::{BufferOrigin, Delimiter};
use super::commands;
use super::context::{GrammafyOptions, ProcessingContext};
use super::postprocess::post_process;
use super::utils::trailing_punctuation;
use crate::data::constants::DOCUMENT_BEGIN;
use crate::features::registry::HandlerRegistry;
use crate::utils::error::{ConversionResult, ConversionWarning, GrammafyError, GrammafyOutput};
use crate::utils::files::{FileResolver, StdFileResolver};

/// LaTeX to plain prose converter
///
/// ```rust
/// use grammafy::{Grammafier, GrammafyOptions};
///
/// let grammafier = Grammafier::with_options(GrammafyOptions::lenient());
/// let output = grammafier.process("Let $x$ be \\emph{small}.", ".").unwrap();
/// assert_eq!(output.text, "Let [_] be small.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Grammafier {
    options: GrammafyOptions,
    registry: HandlerRegistry,
}

impl Grammafier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GrammafyOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &GrammafyOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut GrammafyOptions {
        &mut self.options
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Convert `text`, resolving inclusions against `base_dir` on disk
    pub fn process(
        &self,
        text: &str,
        base_dir: impl AsRef<Path>,
    ) -> ConversionResult<GrammafyOutput> {
        self.process_with_resolver(text, base_dir, "<input>", &self.file_resolver())
    }

    /// Read and convert a document. Inclusions are resolved against the
    /// directory holding it.
    pub fn process_file(&self, path: impl AsRef<Path>) -> ConversionResult<GrammafyOutput> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GrammafyError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        self.process_with_resolver(
            &text,
            base_dir,
            &path.display().to_string(),
            &self.file_resolver(),
        )
    }

    /// Filesystem resolver honouring the configured search paths
    fn file_resolver(&self) -> StdFileResolver {
        let mut resolver = StdFileResolver::new();
        for dir in &self.options.search_paths {
            resolver.add_search_path(dir);
        }
        resolver
    }

    /// Convert `text` with inclusions read through `resolver`.
    ///
    /// `source_name` labels the document in errors and warnings.
    pub fn process_with_resolver(
        &self,
        text: &str,
        base_dir: impl AsRef<Path>,
        source_name: &str,
        resolver: &dyn FileResolver,
    ) -> ConversionResult<GrammafyOutput> {
        tracing::debug!(source = source_name, bytes = text.len(), "grammafy run started");

        let mut ctx = ProcessingContext::new(base_dir, resolver, &self.registry, &self.options);
        ctx.push_text(text, BufferOrigin::Document(source_name.to_string()))?;

        skip_preamble(&mut ctx)?;
        scan(&mut ctx)?;

        if self.options.post_process {
            let cleaned = post_process(ctx.output.assembled_text());
            ctx.output.replace_assembled_text(cleaned);
        }

        let warnings = ctx.warnings;
        let (text, unknown) = ctx.output.into_parts();
        tracing::debug!(
            source = source_name,
            unknown = unknown.len(),
            warnings = warnings.len(),
            "grammafy run finished"
        );

        Ok(GrammafyOutput {
            text,
            unknown,
            warnings,
        })
    }
}

/// Drop everything up to and including `\begin{document}`
fn skip_preamble(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    if ctx.find(DOCUMENT_BEGIN).is_some() {
        return ctx.seek_past(DOCUMENT_BEGIN);
    }

    let source = ctx.source_label();
    if ctx.options().require_document_marker {
        return Err(GrammafyError::MissingPreambleMarker { source });
    }

    tracing::warn!(%source, "no \\begin{{document}}, scanning the whole text");
    ctx.warn(
        ConversionWarning::new(format!("{} has no \\begin{{document}}", source))
            .with_suggestion("the whole text was treated as the document body"),
    );
    Ok(())
}

/// Run the main loop until the buffer stack is empty
pub fn scan(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    while let Some(head) = ctx.stack.head_mut() {
        let Some(distance) = head.distance_to_next_delimiter() else {
            ctx.output.append(head.remaining());
            ctx.stack.pop();
            continue;
        };

        ctx.output.append(&head.remaining()[..distance]);
        head.advance(distance);
        let delimiter = head.current_delimiter();

        match delimiter {
            Some(Delimiter::Command) => commands::handle_command(ctx)?,
            Some(Delimiter::Math) => math(ctx)?,
            Some(Delimiter::Comment) => skip_comment(ctx)?,
            Some(Delimiter::GroupOpen | Delimiter::GroupClose) => ctx.advance(1),
            Some(Delimiter::NonBreakingSpace) => {
                ctx.emit(" ");
                ctx.advance(1);
            }
            None => return Err(GrammafyError::internal("delimiter position out of date")),
        }
    }
    Ok(())
}

/// `$...$` and `$$...$$`
fn math(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    if ctx.remaining().starts_with("$$") {
        ctx.advance(2);
        let end = ctx.expect("$$")?;
        let punctuation = trailing_punctuation(&ctx.remaining()[..end]);

        ctx.emit_placeholder();
        if let Some(p) = punctuation {
            ctx.emit(p.encode_utf8(&mut [0; 4]));
        }
        ctx.advance(end + 2);
        return Ok(());
    }

    ctx.advance(1);
    ctx.emit_placeholder();
    ctx.seek_past("$")
}

/// A comment starting mid-line runs to the end of the line
fn skip_comment(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    if ctx.find("\n").is_some() {
        ctx.seek_past("\n")
    } else {
        ctx.head_mut()?.exhaust();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::files::MemoryFileResolver;
    use pretty_assertions::assert_eq;

    fn raw(text: &str) -> String {
        Grammafier::with_options(GrammafyOptions::raw())
            .process_with_resolver(text, "/doc", "test.tex", &MemoryFileResolver::new())
            .unwrap()
            .text
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(raw("Just some words.\nAnother line."), "Just some words.\nAnother line.");
    }

    #[test]
    fn test_comment_lines_removed() {
        assert_eq!(raw("one\n% dropped\ntwo"), "one\ntwo");
    }

    #[test]
    fn test_inline_math() {
        assert_eq!(raw("Let $x^2$ be"), "Let [_] be");
    }

    #[test]
    fn test_display_math_dollars() {
        assert_eq!(raw("so $$a=b,$$ where"), "so [_], where");
    }

    #[test]
    fn test_unterminated_inline_math() {
        let err = Grammafier::with_options(GrammafyOptions::raw())
            .process_with_resolver("a\nb $x", "/doc", "test.tex", &MemoryFileResolver::new())
            .unwrap_err();
        match err {
            GrammafyError::UnterminatedDelimiter { delimiter, line, .. } => {
                assert_eq!(delimiter, "$");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_mid_line_comment() {
        assert_eq!(raw("kept % gone\nnext"), "kept next");
        assert_eq!(raw("kept % gone"), "kept ");
    }

    #[test]
    fn test_braces_and_tilde() {
        assert_eq!(raw("{grouped}~text"), "grouped text");
    }

    #[test]
    fn test_preamble_skipped() {
        let text = "\\documentclass{article}\n\\begin{document}\nBody\n\\end{document}\nafter";
        let output = Grammafier::new()
            .process_with_resolver(text, "/doc", "test.tex", &MemoryFileResolver::new())
            .unwrap();
        assert_eq!(output.text, "Body");
        assert!(output.unknown.is_empty());
    }

    #[test]
    fn test_missing_preamble_marker() {
        let err = Grammafier::new()
            .process_with_resolver("no marker", "/doc", "test.tex", &MemoryFileResolver::new())
            .unwrap_err();
        assert!(matches!(err, GrammafyError::MissingPreambleMarker { .. }));
    }

    #[test]
    fn test_lenient_missing_marker_warns() {
        let output = Grammafier::with_options(GrammafyOptions::lenient())
            .process_with_resolver("no marker", "/doc", "test.tex", &MemoryFileResolver::new())
            .unwrap();
        assert_eq!(output.text, "no marker");
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].line, Some(1));
    }
}
