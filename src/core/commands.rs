//! Command dispatch and the built-in command handlers
//!
//! A command is the marker followed by a name. The name runs up to the
//! first terminator character; when it is empty the character right after
//! the marker selects a [`SpecialCommand`] instead.
//!
//! Named commands resolve in this order:
//! 1. user void commands
//! 2. built-in void commands
//! 3. user active commands
//! 4. built-in active commands
//! 5. unknown: trailing `[...]`/`{...}` groups are skipped and the name is
//!    recorded

use super::buffer::BufferOrigin;
use super::context::ProcessingContext;
use super::environment;
use super::utils::{matching_close, trailing_punctuation};
use crate::data::constants::{
    COMMAND_TERMINATORS, FOOTNOTE_CLOSE, FOOTNOTE_OPEN, SYMBOL_COMMANDS,
};
use crate::data::tables::{BUILTIN_COMMANDS, BUILTIN_VOID_COMMANDS, SPECIAL_COMMANDS};
use crate::features::registry::CommandKind;
use crate::utils::error::{ConversionResult, GrammafyError};
use crate::utils::files::IncludeTarget;

/// Behaviour of a marker followed by a single non-letter character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// `\\` and a marker at the end of a line; an optional `[...]` spacing
    /// argument is dropped
    LineBreak,
    /// `\[...\]` and `\(...\)`, carrying the closing delimiter
    DisplayMath(&'static str),
    /// Accent marks (`\'e`, `\"o`, ...): the mark is dropped, the letter kept
    Accent,
    /// Escaped literal characters (`\&`, `\%`, `\{`, ...)
    Escaped,
}

/// Name of the command starting at the marker that begins `text`
pub fn command_name(text: &str) -> &str {
    let after = text.get(1..).unwrap_or("");
    match after.chars().next() {
        None => "",
        Some(c) if SYMBOL_COMMANDS.contains(&c) => "",
        Some(_) => {
            let end = after.find(COMMAND_TERMINATORS).unwrap_or(after.len());
            &after[..end]
        }
    }
}

/// Handle the command whose marker is under the read position
pub fn handle_command(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let name = command_name(ctx.remaining()).to_string();
    ctx.advance(1 + name.len());

    if name.is_empty() {
        return dispatch_special(ctx);
    }

    ctx.command.clone_from(&name);
    dispatch_named(ctx, &name)
}

fn dispatch_named(ctx: &mut ProcessingContext<'_>, name: &str) -> ConversionResult<()> {
    let registry = ctx.registry;

    if registry.is_void_command(name) || BUILTIN_VOID_COMMANDS.contains(name) {
        return Ok(());
    }
    if let Some(kind) = registry.command(name) {
        return run_command(ctx, kind);
    }
    if let Some(kind) = BUILTIN_COMMANDS.get(name) {
        return run_command(ctx, kind);
    }

    skip_unknown(ctx, name)
}

fn run_command(ctx: &mut ProcessingContext<'_>, kind: &CommandKind) -> ConversionResult<()> {
    match kind {
        CommandKind::SkipGroups(count) => skip_groups(ctx, *count),
        CommandKind::Reference => reference(ctx),
        CommandKind::Footnote => footnote(ctx),
        CommandKind::Include => include(ctx),
        CommandKind::Begin => environment::begin(ctx),
        CommandKind::End => environment::end(ctx),
        CommandKind::ColorName => color(ctx),
        CommandKind::Literal(text) => {
            ctx.emit(text);
            Ok(())
        }
        CommandKind::Custom(handler) => handler(ctx),
    }
}

fn dispatch_special(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let Some(c) = ctx.remaining().chars().next() else {
        return Ok(());
    };
    ctx.command = c.to_string();

    match SPECIAL_COMMANDS.get(&c).copied() {
        Some(SpecialCommand::LineBreak) => {
            ctx.emit("\n");
            ctx.advance_char();
            skip_optional_groups(ctx)
        }
        Some(SpecialCommand::DisplayMath(close)) => display_math(ctx, close),
        Some(SpecialCommand::Accent) => {
            ctx.advance_char();
            Ok(())
        }
        Some(SpecialCommand::Escaped) => {
            ctx.emit(c.encode_utf8(&mut [0; 4]));
            ctx.advance_char();
            Ok(())
        }
        None => {
            ctx.emit(" ");
            ctx.advance_char();
            Ok(())
        }
    }
}

// =============================================================================
// Group skipping
// =============================================================================

/// Advance past the balanced `open`...`close` group under the read position
fn skip_balanced(ctx: &mut ProcessingContext<'_>, open: char, close: char) -> ConversionResult<()> {
    let end = matching_close(ctx.remaining(), open, close)
        .ok_or_else(|| ctx.unterminated(close.encode_utf8(&mut [0; 4])))?;
    ctx.advance(end + close.len_utf8());
    Ok(())
}

/// Drop any `[...]` groups directly under the read position
pub(crate) fn skip_optional_groups(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    while ctx.starts_with('[') {
        skip_balanced(ctx, '[', ']')?;
    }
    Ok(())
}

/// Drop one mandatory argument. A braced group is matched by depth,
/// anything else runs to the next closing brace.
fn skip_mandatory_group(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    if ctx.starts_with('{') {
        skip_balanced(ctx, '{', '}')
    } else {
        ctx.seek_past("}")
    }
}

fn skip_groups(ctx: &mut ProcessingContext<'_>, count: u8) -> ConversionResult<()> {
    skip_optional_groups(ctx)?;
    for _ in 0..count {
        skip_mandatory_group(ctx)?;
    }
    Ok(())
}

/// Unknown command: drop every group that directly follows and remember
/// the name
fn skip_unknown(ctx: &mut ProcessingContext<'_>, name: &str) -> ConversionResult<()> {
    loop {
        if ctx.starts_with('{') {
            skip_balanced(ctx, '{', '}')?;
        } else if ctx.starts_with('[') {
            skip_balanced(ctx, '[', ']')?;
        } else {
            break;
        }
    }
    ctx.record_unknown(name);
    Ok(())
}

// =============================================================================
// Built-in handlers
// =============================================================================

/// `\[...\]` and `\(...\)`: the read position is on the opening bracket
fn display_math(ctx: &mut ProcessingContext<'_>, close: &str) -> ConversionResult<()> {
    let end = ctx.expect(close)?;
    let punctuation = trailing_punctuation(ctx.remaining().get(1..end).unwrap_or(""));

    ctx.emit_placeholder();
    if let Some(p) = punctuation {
        ctx.emit(p.encode_utf8(&mut [0; 4]));
    }
    ctx.advance(end + close.len());
    Ok(())
}

/// `\cite[opt]{key}`, `\ref{label}`, ...
fn reference(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    ctx.emit_placeholder();
    skip_optional_groups(ctx)?;
    skip_mandatory_group(ctx)
}

/// `\color{name}` becomes `Color:NAME`
fn color(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let end = ctx.expect("}")?;
    let name = ctx.remaining()[..end]
        .trim_start_matches('{')
        .trim()
        .to_uppercase();

    ctx.emit("Color:");
    ctx.emit(&name);
    ctx.advance(end + 1);
    Ok(())
}

/// The footnote text is wrapped and pushed so it is scanned like the body
fn footnote(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    skip_optional_groups(ctx)?;
    let rest = ctx.remaining();
    let spaces = rest.len() - rest.trim_start().len();
    if !rest[spaces..].starts_with('{') {
        return Ok(());
    }
    ctx.advance(spaces);

    let end = matching_close(ctx.remaining(), '{', '}').ok_or_else(|| ctx.unterminated("}"))?;
    let text = format!(
        "{}{}{}",
        FOOTNOTE_OPEN,
        &ctx.remaining()[1..end],
        FOOTNOTE_CLOSE
    );
    ctx.advance(end + 1);
    ctx.push_text(&text, BufferOrigin::Synthesized("footnote"))
}

/// `\input{file}` and `\include{file}`
///
/// The including buffer is moved past the argument before the included
/// file is pushed, so scanning resumes right after it once the file is
/// exhausted.
fn include(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let end = ctx.expect("}")?;
    let target = IncludeTarget::classify(ctx.remaining()[..end].trim_start_matches('{'));
    ctx.advance(end + 1);

    let relative = match target {
        IncludeTarget::Bibliography => {
            tracing::debug!("bibliography include skipped");
            return Ok(());
        }
        IncludeTarget::Document(relative) if ctx.options.follow_includes => relative,
        IncludeTarget::Document(relative) => {
            tracing::debug!(file = %relative, "include not followed");
            return Ok(());
        }
    };

    let path = ctx.resolver.resolve_path(&ctx.base_dir, &relative);
    if ctx.stack.contains_file(&path) {
        return Err(GrammafyError::IncludeCycle { path });
    }

    let content = ctx.resolver.read_file(&path).map_err(|e| {
        GrammafyError::missing_include(&path, ctx.source_label(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "include_resolved");
    ctx.push_text(&content, BufferOrigin::Include(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::GrammafyOptions;
    use crate::features::registry::HandlerRegistry;
    use crate::utils::files::MemoryFileResolver;
    use pretty_assertions::assert_eq;

    /// Run `handle_command` once on `text` and return the emitted text and
    /// what is left of the buffer
    fn run_once(text: &str) -> (String, String) {
        let resolver = MemoryFileResolver::new().with_file("/doc/sub.tex", "Included");
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text(text, BufferOrigin::Document("test.tex".to_string()))
            .unwrap();
        handle_command(&mut ctx).unwrap();
        let rest = ctx.remaining().to_string();
        let out = ctx.output.assembled_text().to_string();
        (out, rest)
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("\\textbf{x}"), "textbf");
        assert_eq!(command_name("\\section*{Intro}"), "section*");
        assert_eq!(command_name("\\LaTeX"), "LaTeX");
        assert_eq!(command_name("\\\\ next"), "");
        assert_eq!(command_name("\\& more"), "");
        assert_eq!(command_name("\\'e"), "");
        assert_eq!(command_name("\\"), "");
    }

    #[test]
    fn test_void_command_keeps_argument() {
        let (out, rest) = run_once("\\textbf{bold} text");
        assert_eq!(out, "");
        assert_eq!(rest, "{bold} text");
    }

    #[test]
    fn test_skip_groups() {
        let (_, rest) = run_once("\\label{sec:intro} after");
        assert_eq!(rest, " after");

        let (_, rest) = run_once("\\setlength{\\parindent}{0pt}after");
        assert_eq!(rest, "after");

        let (_, rest) = run_once("\\includegraphics[width=\\linewidth]{fig.png}.");
        assert_eq!(rest, ".");
    }

    #[test]
    fn test_reference() {
        let (out, rest) = run_once("\\cite[p.~4]{knuth} says");
        assert_eq!(out, "[_]");
        assert_eq!(rest, " says");
    }

    #[test]
    fn test_color() {
        let (out, rest) = run_once("\\color{red}warning");
        assert_eq!(out, "Color:RED");
        assert_eq!(rest, "warning");
    }

    #[test]
    fn test_literal() {
        let (out, rest) = run_once("\\ldots and");
        assert_eq!(out, "...");
        assert_eq!(rest, " and");
    }

    #[test]
    fn test_unknown_command_skips_groups() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text(
            "\\mystery[a[b]]{x{y}}{z} tail",
            BufferOrigin::Document("test.tex".to_string()),
        )
        .unwrap();
        handle_command(&mut ctx).unwrap();
        assert_eq!(ctx.remaining(), " tail");
        assert!(ctx.output.unknown().contains("mystery"));
    }

    #[test]
    fn test_unknown_command_unterminated_group() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\mystery{never", BufferOrigin::Document("test.tex".to_string()))
            .unwrap();
        let err = handle_command(&mut ctx).unwrap_err();
        assert!(matches!(err, GrammafyError::UnterminatedDelimiter { .. }));
    }

    #[test]
    fn test_special_commands() {
        assert_eq!(run_once("\\\\[2pt]next"), ("\n".to_string(), "next".to_string()));
        assert_eq!(run_once("\\&co"), ("&".to_string(), "co".to_string()));
        assert_eq!(run_once("\\'ecole"), ("".to_string(), "ecole".to_string()));
        assert_eq!(run_once("\\,x"), (" ".to_string(), "x".to_string()));
    }

    #[test]
    fn test_display_math_punctuation() {
        let (out, rest) = run_once("\\[x=5.\\] Then");
        assert_eq!(out, "[_].");
        assert_eq!(rest, " Then");

        let (out, _) = run_once("\\(a+b\\)");
        assert_eq!(out, "[_]");
    }

    #[test]
    fn test_footnote_pushes_buffer() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\footnote{a {b} c} after", BufferOrigin::Document("t".to_string()))
            .unwrap();
        handle_command(&mut ctx).unwrap();
        assert_eq!(ctx.stack.depth(), 2);
        assert_eq!(ctx.remaining(), "(FOOTNOTE: a {b} c)");
        assert_eq!(ctx.stack.parent().unwrap().remaining(), " after");
    }

    #[test]
    fn test_footnote_with_space_before_argument() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\footnote {spaced} after", BufferOrigin::Document("t".to_string()))
            .unwrap();
        handle_command(&mut ctx).unwrap();
        assert_eq!(ctx.remaining(), "(FOOTNOTE: spaced)");
        assert_eq!(ctx.stack.parent().unwrap().remaining(), " after");
    }

    #[test]
    fn test_footnote_with_escaped_brace() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\footnote{a \\} b} c", BufferOrigin::Document("t".to_string()))
            .unwrap();
        handle_command(&mut ctx).unwrap();
        assert_eq!(ctx.remaining(), "(FOOTNOTE: a \\} b)");
        assert_eq!(ctx.stack.parent().unwrap().remaining(), " c");
    }

    #[test]
    fn test_unknown_command_with_escaped_brace() {
        let (_, rest) = run_once("\\mystery{50\\{} after");
        assert_eq!(rest, " after");
    }

    #[test]
    fn test_include_pushes_file() {
        let resolver = MemoryFileResolver::new().with_file("/doc/sub.tex", "Included");
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\input{sub} rest", BufferOrigin::Document("t".to_string()))
            .unwrap();
        handle_command(&mut ctx).unwrap();
        assert_eq!(ctx.remaining(), "Included");
        assert_eq!(ctx.stack.parent().unwrap().remaining(), " rest");
    }

    #[test]
    fn test_include_bibliography_is_not_read() {
        let (out, rest) = run_once("\\include{refs.bbl}end");
        assert_eq!(out, "");
        assert_eq!(rest, "end");
    }

    #[test]
    fn test_missing_include() {
        let resolver = MemoryFileResolver::new();
        let registry = HandlerRegistry::new();
        let options = GrammafyOptions::default();
        let mut ctx = ProcessingContext::new("/doc", &resolver, &registry, &options);
        ctx.push_text("\\input{gone}", BufferOrigin::Document("main.tex".to_string()))
            .unwrap();
        match handle_command(&mut ctx).unwrap_err() {
            GrammafyError::MissingInclude {
                path,
                included_from,
                ..
            } => {
                assert_eq!(path, std::path::PathBuf::from("/doc/gone.tex"));
                assert_eq!(included_from, "main.tex");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
