//! `\begin{...}` and `\end{...}` handling
//!
//! Environment names resolve through the same tiers as commands:
//! transparent (user, then built-in), active (user, then built-in), and
//! finally the unknown fallback which skips the whole environment.

use super::buffer::BufferOrigin;
use super::commands::skip_optional_groups;
use super::context::ProcessingContext;
use super::utils::{capitalize, find_matching_end, rewrite_items, trailing_punctuation};
use crate::data::constants::DOCUMENT_ENVIRONMENT;
use crate::data::tables::{BUILTIN_ENVIRONMENTS, BUILTIN_TRANSPARENT_ENVIRONMENTS};
use crate::features::registry::{EnvironmentKind, HandlerRegistry};
use crate::utils::error::ConversionResult;

fn end_tag(name: &str) -> String {
    format!("\\end{{{}}}", name)
}

/// Read the `{name}` argument of `\begin` or `\end` and move past it
fn environment_name(ctx: &mut ProcessingContext<'_>) -> ConversionResult<String> {
    let end = ctx.expect("}")?;
    let name = ctx.remaining()[..end]
        .trim_start()
        .trim_start_matches('{')
        .trim()
        .to_string();
    ctx.advance(end + 1);
    Ok(name)
}

pub fn begin(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let name = environment_name(ctx)?;
    ctx.command.clone_from(&name);
    let registry = ctx.registry;

    if registry.is_transparent_environment(&name)
        || BUILTIN_TRANSPARENT_ENVIRONMENTS.contains(name.as_str())
    {
        return Ok(());
    }
    if let Some(kind) = registry.environment(&name) {
        return run_environment(ctx, &name, kind);
    }
    if let Some(kind) = BUILTIN_ENVIRONMENTS.get(name.as_str()) {
        return run_environment(ctx, &name, kind);
    }

    skip_unknown(ctx, &name)
}

/// `\end{document}` stops the scan; every other end tag only has its
/// marker consumed
pub fn end(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
    let name = environment_name(ctx)?;
    if name == DOCUMENT_ENVIRONMENT {
        tracing::debug!(depth = ctx.stack.depth(), "end of document");
        ctx.stack.clear();
    }
    ctx.command = name;
    Ok(())
}

fn run_environment(
    ctx: &mut ProcessingContext<'_>,
    name: &str,
    kind: &EnvironmentKind,
) -> ConversionResult<()> {
    match kind {
        EnvironmentKind::Titled => {
            let title = capitalize(name.trim_end_matches('*'));
            ctx.emit(&title);
            ctx.emit(".");
            Ok(())
        }
        EnvironmentKind::Named(title) => {
            ctx.emit(title);
            ctx.emit(".");
            Ok(())
        }
        EnvironmentKind::Math => math(ctx, name),
        EnvironmentKind::OrderedList => list(ctx, name, true),
        EnvironmentKind::UnorderedList => list(ctx, name, false),
        EnvironmentKind::Custom(handler) => handler(ctx),
    }
}

/// Replace the whole body with the placeholder. These environments do not
/// nest, so the first end tag closes the body.
fn math(ctx: &mut ProcessingContext<'_>, name: &str) -> ConversionResult<()> {
    let close = end_tag(name);
    let end = ctx.expect(&close)?;
    let punctuation = trailing_punctuation(&ctx.remaining()[..end]);

    ctx.emit_placeholder();
    if let Some(p) = punctuation {
        ctx.emit(p.encode_utf8(&mut [0; 4]));
    }
    ctx.advance(end + close.len());
    Ok(())
}

/// Whether `name` resolves to a list through the environment tiers
fn is_list_environment(registry: &HandlerRegistry, name: &str) -> bool {
    if registry.is_transparent_environment(name) || BUILTIN_TRANSPARENT_ENVIRONMENTS.contains(name)
    {
        return false;
    }
    let kind = registry
        .environment(name)
        .or_else(|| BUILTIN_ENVIRONMENTS.get(name));
    matches!(
        kind,
        Some(EnvironmentKind::OrderedList | EnvironmentKind::UnorderedList)
    )
}

/// Rewrite the items of the body and push it back for scanning
fn list(ctx: &mut ProcessingContext<'_>, name: &str, ordered: bool) -> ConversionResult<()> {
    skip_optional_groups(ctx)?;

    let (body_end, end) = find_matching_end(ctx.remaining(), name)
        .ok_or_else(|| ctx.unterminated(&end_tag(name)))?;
    let registry = ctx.registry;
    let body = rewrite_items(&ctx.remaining()[..body_end], ordered, |inner| {
        is_list_environment(registry, inner)
    });

    ctx.advance(end);
    ctx.push_text(&body, BufferOrigin::Synthesized("list"))
}

/// Skip an unknown environment, nested same-name occurrences included
fn skip_unknown(ctx: &mut ProcessingContext<'_>, name: &str) -> ConversionResult<()> {
    let (_, end) = find_matching_end(ctx.remaining(), name)
        .ok_or_else(|| ctx.unterminated(&end_tag(name)))?;
    let position = ctx.stack.head().map(|head| head.position()).unwrap_or(0);

    ctx.jump_to(position + end)?;
    ctx.record_unknown(format!("begin{{{}}}", name));
    Ok(())
}
