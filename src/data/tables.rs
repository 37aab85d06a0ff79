//! Built-in command and environment tables
//!
//! These are the built-in tiers of the dispatch order. User registrations
//! in [`crate::features::registry::HandlerRegistry`] are consulted first.

use phf::{phf_map, phf_set};
use std::borrow::Cow;

use crate::core::commands::SpecialCommand;
use crate::features::registry::{CommandKind, EnvironmentKind};

/// Commands dropped on sight. Their arguments stay in the text, so
/// `\textbf{word}` becomes `word`.
pub static BUILTIN_VOID_COMMANDS: phf::Set<&'static str> = phf_set! {
    // Layout
    "centering",
    "newpage",
    "clearpage",
    "maketitle",
    "tableofcontents",
    "appendix",
    "noindent",
    "bigskip",
    "medskip",
    "smallskip",
    "vfill",
    "hfill",
    "printbibliography",
    "marker",
    "bookmark",
    "compat",
    "preprint",
    // Font sizes
    "tiny",
    "scriptsize",
    "footnotesize",
    "small",
    "normalsize",
    "large",
    "Large",
    "LARGE",
    "huge",
    "Huge",
    "selectfont",
    // Font styles
    "textbf",
    "textit",
    "textsc",
    "texttt",
    "textrm",
    "textsf",
    "emph",
    "underline",
    "bf",
    "bfseries",
    "it",
    "itshape",
    "em",
    "text",
    "mbox",
    "bbox",
    // Sectioning (the title text is kept)
    "part",
    "chapter",
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "chapter*",
    "section*",
    "subsection*",
    "subsubsection*",
    "paragraph*",
    // Title metadata (the text is kept)
    "author",
    "title",
    "date",
    "address",
    "affiliation",
    "thanks",
    "texorpdfstring",
    // Symbols
    "p",
    "S",
};

/// Built-in active commands
pub static BUILTIN_COMMANDS: phf::Map<&'static str, CommandKind> = phf_map! {
    "begin" => CommandKind::Begin,
    "end" => CommandKind::End,
    "include" => CommandKind::Include,
    "input" => CommandKind::Include,
    "footnote" => CommandKind::Footnote,
    "color" => CommandKind::ColorName,
    // Arguments with no prose in them
    "addchap" => CommandKind::SkipGroups(1),
    "addsec" => CommandKind::SkipGroups(1),
    "bibliography" => CommandKind::SkipGroups(1),
    "bibliographystyle" => CommandKind::SkipGroups(1),
    "chaptermark" => CommandKind::SkipGroups(1),
    "email" => CommandKind::SkipGroups(1),
    "fontfamily" => CommandKind::SkipGroups(1),
    "hspace" => CommandKind::SkipGroups(1),
    "hspace*" => CommandKind::SkipGroups(1),
    "vspace" => CommandKind::SkipGroups(1),
    "vspace*" => CommandKind::SkipGroups(1),
    "includegraphics" => CommandKind::SkipGroups(1),
    "label" => CommandKind::SkipGroups(1),
    "nocite" => CommandKind::SkipGroups(1),
    "pagenumbering" => CommandKind::SkipGroups(1),
    "pagestyle" => CommandKind::SkipGroups(1),
    "thispagestyle" => CommandKind::SkipGroups(1),
    "rule" => CommandKind::SkipGroups(2),
    "renewcommand" => CommandKind::SkipGroups(2),
    "setlength" => CommandKind::SkipGroups(2),
    // References and citations
    "cite" => CommandKind::Reference,
    "citep" => CommandKind::Reference,
    "citet" => CommandKind::Reference,
    "parencite" => CommandKind::Reference,
    "textcite" => CommandKind::Reference,
    "ref" => CommandKind::Reference,
    "refp" => CommandKind::Reference,
    "eqref" => CommandKind::Reference,
    "eqrefp" => CommandKind::Reference,
    "cref" => CommandKind::Reference,
    "Cref" => CommandKind::Reference,
    "autoref" => CommandKind::Reference,
    "pageref" => CommandKind::Reference,
    // Logos and dots
    "LaTeX" => CommandKind::Literal(Cow::Borrowed("LaTeX")),
    "TeX" => CommandKind::Literal(Cow::Borrowed("TeX")),
    "BibTeX" => CommandKind::Literal(Cow::Borrowed("BibTeX")),
    "ldots" => CommandKind::Literal(Cow::Borrowed("...")),
    "dots" => CommandKind::Literal(Cow::Borrowed("...")),
};

/// Commands made of the marker and one non-letter character
pub static SPECIAL_COMMANDS: phf::Map<char, SpecialCommand> = phf_map! {
    '\\' => SpecialCommand::LineBreak,
    '\n' => SpecialCommand::LineBreak,
    '[' => SpecialCommand::DisplayMath("\\]"),
    '(' => SpecialCommand::DisplayMath("\\)"),
    '\'' => SpecialCommand::Accent,
    '"' => SpecialCommand::Accent,
    '`' => SpecialCommand::Accent,
    '^' => SpecialCommand::Accent,
    '=' => SpecialCommand::Accent,
    '.' => SpecialCommand::Accent,
    '~' => SpecialCommand::Escaped,
    '&' => SpecialCommand::Escaped,
    '%' => SpecialCommand::Escaped,
    '#' => SpecialCommand::Escaped,
    '_' => SpecialCommand::Escaped,
    '$' => SpecialCommand::Escaped,
    '{' => SpecialCommand::Escaped,
    '}' => SpecialCommand::Escaped,
};

/// Environments whose markers are dropped while the body is kept
pub static BUILTIN_TRANSPARENT_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "document",
    "abstract",
    "center",
    "flushleft",
    "flushright",
    "quote",
    "quotation",
    "verse",
    "tcolorbox",
    "frame",
};

/// Built-in active environments
pub static BUILTIN_ENVIRONMENTS: phf::Map<&'static str, EnvironmentKind> = phf_map! {
    // Titled
    "proof" => EnvironmentKind::Titled,
    "theorem" => EnvironmentKind::Titled,
    "lemma" => EnvironmentKind::Titled,
    "corollary" => EnvironmentKind::Titled,
    "proposition" => EnvironmentKind::Titled,
    "definition" => EnvironmentKind::Titled,
    "remark" => EnvironmentKind::Titled,
    "example" => EnvironmentKind::Titled,
    "exercise" => EnvironmentKind::Titled,
    "assumption" => EnvironmentKind::Titled,
    "conjecture" => EnvironmentKind::Titled,
    "claim" => EnvironmentKind::Titled,
    "note" => EnvironmentKind::Titled,
    "thm" => EnvironmentKind::Named(Cow::Borrowed("Theorem")),
    "lem" => EnvironmentKind::Named(Cow::Borrowed("Lemma")),
    "cor" => EnvironmentKind::Named(Cow::Borrowed("Corollary")),
    "prop" => EnvironmentKind::Named(Cow::Borrowed("Proposition")),
    "defn" => EnvironmentKind::Named(Cow::Borrowed("Definition")),
    "rem" => EnvironmentKind::Named(Cow::Borrowed("Remark")),
    // Math and floats
    "equation" => EnvironmentKind::Math,
    "equation*" => EnvironmentKind::Math,
    "align" => EnvironmentKind::Math,
    "align*" => EnvironmentKind::Math,
    "alignat" => EnvironmentKind::Math,
    "alignat*" => EnvironmentKind::Math,
    "flalign" => EnvironmentKind::Math,
    "flalign*" => EnvironmentKind::Math,
    "gather" => EnvironmentKind::Math,
    "gather*" => EnvironmentKind::Math,
    "multline" => EnvironmentKind::Math,
    "multline*" => EnvironmentKind::Math,
    "eqnarray" => EnvironmentKind::Math,
    "eqnarray*" => EnvironmentKind::Math,
    "displaymath" => EnvironmentKind::Math,
    "math" => EnvironmentKind::Math,
    "figure" => EnvironmentKind::Math,
    "figure*" => EnvironmentKind::Math,
    "wrapfigure" => EnvironmentKind::Math,
    "table" => EnvironmentKind::Math,
    "table*" => EnvironmentKind::Math,
    "tabular" => EnvironmentKind::Math,
    "tabular*" => EnvironmentKind::Math,
    "tabularx" => EnvironmentKind::Math,
    "longtable" => EnvironmentKind::Math,
    "tikzpicture" => EnvironmentKind::Math,
    "algorithm" => EnvironmentKind::Math,
    "verbatim" => EnvironmentKind::Math,
    "lstlisting" => EnvironmentKind::Math,
    // Lists
    "enumerate" => EnvironmentKind::OrderedList,
    "itemize" => EnvironmentKind::UnorderedList,
    "description" => EnvironmentKind::UnorderedList,
};
