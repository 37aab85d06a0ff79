//! Handler kinds and the user-extensible handler tables
//!
//! Commands and environments resolve to a closed set of behaviours
//! ([`CommandKind`], [`EnvironmentKind`]). Each set has one `Custom`
//! variant carrying a plain function, which is how callers plug in logic
//! the built-in behaviours do not cover.
//!
//! ## Example
//!
//! ```rust
//! use grammafy::features::registry::{CommandKind, HandlerRegistry};
//! use grammafy::core::ProcessingContext;
//! use grammafy::ConversionResult;
//!
//! fn shout(ctx: &mut ProcessingContext<'_>) -> ConversionResult<()> {
//!     ctx.emit("HEY");
//!     Ok(())
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_void_command("marker");
//! registry.register_command("citet", CommandKind::Reference);
//! registry.register_handler("shout", shout);
//! assert!(registry.is_void_command("marker"));
//! ```

use indexmap::{IndexMap, IndexSet};
use std::borrow::Cow;
use std::fmt;

use crate::core::context::ProcessingContext;
use crate::utils::error::ConversionResult;

/// Signature of a custom command or environment handler.
///
/// A handler reads its own arguments from the head buffer, advances past
/// everything it consumed and appends zero or more fragments.
pub type HandlerFn = fn(&mut ProcessingContext<'_>) -> ConversionResult<()>;

/// Behaviour attached to a command name
#[derive(Clone)]
pub enum CommandKind {
    /// Drop the command together with this many `{...}` arguments
    /// (a leading `[...]` option is dropped as well)
    SkipGroups(u8),
    /// Replace `[opt]{key}` with the placeholder (`\cite`, `\ref`, ...)
    Reference,
    /// Rescan the argument wrapped as `(FOOTNOTE: ...)`
    Footnote,
    /// Splice in another document (`\input`, `\include`)
    Include,
    /// Environment start
    Begin,
    /// Environment end
    End,
    /// Emit `Color:` followed by the upper-cased colour name
    ColorName,
    /// Emit fixed text (`\LaTeX` -> `LaTeX`)
    Literal(Cow<'static, str>),
    /// User-supplied logic
    Custom(HandlerFn),
}

impl fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::SkipGroups(n) => write!(f, "SkipGroups({})", n),
            CommandKind::Reference => write!(f, "Reference"),
            CommandKind::Footnote => write!(f, "Footnote"),
            CommandKind::Include => write!(f, "Include"),
            CommandKind::Begin => write!(f, "Begin"),
            CommandKind::End => write!(f, "End"),
            CommandKind::ColorName => write!(f, "ColorName"),
            CommandKind::Literal(text) => write!(f, "Literal({:?})", text),
            CommandKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Behaviour attached to an environment name
#[derive(Clone)]
pub enum EnvironmentKind {
    /// Emit the capitalised name followed by a period (`proof` -> `Proof.`)
    Titled,
    /// Emit the given title followed by a period (`thm` -> `Theorem.`)
    Named(Cow<'static, str>),
    /// Replace the whole body with the placeholder
    Math,
    /// Number each top-level `\item` as `1.`, `2.`, ...
    OrderedList,
    /// Replace each top-level `\item` with a bullet
    UnorderedList,
    /// User-supplied logic, called right after `\begin{name}`
    Custom(HandlerFn),
}

impl fmt::Debug for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentKind::Titled => write!(f, "Titled"),
            EnvironmentKind::Named(title) => write!(f, "Named({:?})", title),
            EnvironmentKind::Math => write!(f, "Math"),
            EnvironmentKind::OrderedList => write!(f, "OrderedList"),
            EnvironmentKind::UnorderedList => write!(f, "UnorderedList"),
            EnvironmentKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// User-extensible handler tables.
///
/// These are consulted before the built-in tables of the same tier, so a
/// registration here overrides a built-in behaviour.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    void_commands: IndexSet<String>,
    commands: IndexMap<String, CommandKind>,
    transparent_environments: IndexSet<String>,
    environments: IndexMap<String, EnvironmentKind>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop `\name` but leave its arguments in the text
    pub fn register_void_command(&mut self, name: impl Into<String>) {
        self.void_commands.insert(name.into());
    }

    pub fn register_command(&mut self, name: impl Into<String>, kind: CommandKind) {
        self.commands.insert(name.into(), kind);
    }

    pub fn register_handler(&mut self, name: impl Into<String>, handler: HandlerFn) {
        self.register_command(name, CommandKind::Custom(handler));
    }

    /// Drop `\begin{name}` and `\end{name}` but keep the body
    pub fn register_transparent_environment(&mut self, name: impl Into<String>) {
        self.transparent_environments.insert(name.into());
    }

    pub fn register_environment(&mut self, name: impl Into<String>, kind: EnvironmentKind) {
        self.environments.insert(name.into(), kind);
    }

    pub fn register_environment_handler(&mut self, name: impl Into<String>, handler: HandlerFn) {
        self.register_environment(name, EnvironmentKind::Custom(handler));
    }

    pub fn is_void_command(&self, name: &str) -> bool {
        self.void_commands.contains(name)
    }

    pub fn command(&self, name: &str) -> Option<&CommandKind> {
        self.commands.get(name)
    }

    pub fn is_transparent_environment(&self, name: &str) -> bool {
        self.transparent_environments.contains(name)
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentKind> {
        self.environments.get(name)
    }

    /// Total number of registered names
    pub fn len(&self) -> usize {
        self.void_commands.len()
            + self.commands.len()
            + self.transparent_environments.len()
            + self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
