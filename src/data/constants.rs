//! Fixed characters and markers shared by the scanner and the handlers

/// Replacement text for any piece of mathematics, references and floats
pub const PLACEHOLDER: &str = "[_]";

/// Marker emitted in place of `\item` inside unordered lists
pub const BULLET: &str = "-";

/// Everything up to and including this marker is preamble
pub const DOCUMENT_BEGIN: &str = "\\begin{document}";

/// Name of the environment whose end stops the scan
pub const DOCUMENT_ENVIRONMENT: &str = "document";

pub const DOCUMENT_EXTENSION: &str = ".tex";
pub const BIBLIOGRAPHY_EXTENSION: &str = ".bbl";

/// Prefix and suffix wrapped around footnote text before it is rescanned
pub const FOOTNOTE_OPEN: &str = "(FOOTNOTE: ";
pub const FOOTNOTE_CLOSE: &str = ")";

pub const ITEM_MARKER: &str = "\\item";

// The six structurally significant characters
pub const COMMAND_MARKER: char = '\\';
pub const GROUP_OPEN: char = '{';
pub const GROUP_CLOSE: char = '}';
pub const MATH_MARKER: char = '$';
pub const COMMENT_MARKER: char = '%';
pub const NBSP_MARKER: char = '~';

/// Characters that end a command name
pub const COMMAND_TERMINATORS: &[char] = &[
    ' ', '{', '}', '.', ',', ':', ';', '[', ']', '(', ')', '$', '\\', '\n', '"', '\'', '~',
];

/// Symbols that form a one-character command when escaped (`\&`, `\^`, ...)
/// even though they do not terminate ordinary command names
pub const SYMBOL_COMMANDS: &[char] = &['&', '%', '#', '_', '^', '`', '='];

/// Punctuation carried over from the end of display math to after the placeholder
pub const SENTENCE_PUNCTUATION: &[char] = &[',', ';', '.'];

/// Default limit on nested buffers (inclusions, footnotes, list bodies)
pub const DEFAULT_MAX_STACK_DEPTH: usize = 64;
