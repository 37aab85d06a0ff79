//! Cursor buffers and the buffer stack
//!
//! A [`CursorBuffer`] is one piece of source text with a forward-only read
//! position. The [`BufferStack`] holds the document buffer at the bottom
//! and everything spliced in while scanning (included files, footnotes,
//! rewritten list bodies) above it. Only the top buffer is read.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::data::constants::{
    COMMAND_MARKER, COMMENT_MARKER, GROUP_CLOSE, GROUP_OPEN, MATH_MARKER, NBSP_MARKER,
};
use crate::utils::error::{ConversionResult, GrammafyError};

/// The six characters that interrupt plain-text copying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Command,
    GroupOpen,
    GroupClose,
    Math,
    Comment,
    NonBreakingSpace,
}

impl Delimiter {
    pub const ALL: [Delimiter; 6] = [
        Delimiter::Command,
        Delimiter::GroupOpen,
        Delimiter::GroupClose,
        Delimiter::Math,
        Delimiter::Comment,
        Delimiter::NonBreakingSpace,
    ];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Command => COMMAND_MARKER,
            Delimiter::GroupOpen => GROUP_OPEN,
            Delimiter::GroupClose => GROUP_CLOSE,
            Delimiter::Math => MATH_MARKER,
            Delimiter::Comment => COMMENT_MARKER,
            Delimiter::NonBreakingSpace => NBSP_MARKER,
        }
    }

    pub fn classify(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_char() == c)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Where the text of a buffer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferOrigin {
    /// The document handed to the engine
    Document(String),
    /// A file spliced in by `\input` or `\include`
    Include(PathBuf),
    /// Text produced by a handler (footnotes, list bodies)
    Synthesized(&'static str),
}

impl BufferOrigin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BufferOrigin::Include(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for BufferOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferOrigin::Document(name) => write!(f, "{}", name),
            BufferOrigin::Include(path) => write!(f, "{}", path.display()),
            BufferOrigin::Synthesized(what) => write!(f, "<{}>", what),
        }
    }
}

/// A literal searched for with [`CursorBuffer::seek_past`] was not found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterNotFound(pub String);

/// A handler tried to move the read position backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackwardCursorFault {
    pub from: usize,
    pub to: usize,
}

/// Cached location of the next occurrence of one delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unknown,
    At(usize),
    Exhausted,
}

/// A text segment with a forward-only read position
#[derive(Debug, Clone)]
pub struct CursorBuffer {
    text: String,
    pos: usize,
    next: [Slot; 6],
    origin: BufferOrigin,
}

impl CursorBuffer {
    /// Create a buffer, dropping every comment line up front
    pub fn new(text: &str, origin: BufferOrigin) -> Self {
        Self {
            text: strip_comment_lines(text),
            pos: 0,
            next: [Slot::Unknown; 6],
            origin,
        }
    }

    pub fn origin(&self) -> &BufferOrigin {
        &self.origin
    }

    /// Current read position as a byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Text from the read position to the end
    pub fn remaining(&self) -> &str {
        &self.text[self.pos..]
    }

    /// Move forward by `n` bytes, never past the end
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Move forward by one character, whatever its encoded width
    pub fn advance_char(&mut self) {
        if let Some(c) = self.remaining().chars().next() {
            self.advance(c.len_utf8());
        }
    }

    /// Move to an absolute position.
    ///
    /// Moving backwards would rescan text forever, so the buffer is
    /// exhausted instead and the fault is reported to the caller.
    pub fn jump_to(&mut self, target: usize) -> Result<(), BackwardCursorFault> {
        if target < self.pos {
            let fault = BackwardCursorFault {
                from: self.pos,
                to: target,
            };
            self.pos = self.text.len();
            return Err(fault);
        }
        self.pos = target.min(self.text.len());
        Ok(())
    }

    /// Skip the rest of the buffer
    pub fn exhaust(&mut self) {
        self.pos = self.text.len();
    }

    /// Offset of the nearest delimiter from the read position, or `None`
    /// when no delimiter remains
    pub fn distance_to_next_delimiter(&mut self) -> Option<usize> {
        for delimiter in Delimiter::ALL {
            let slot = &mut self.next[delimiter.index()];
            let stale = match *slot {
                Slot::Unknown => true,
                Slot::At(at) => at < self.pos,
                Slot::Exhausted => false,
            };
            if stale {
                *slot = match self.text[self.pos..].find(delimiter.as_char()) {
                    Some(offset) => Slot::At(self.pos + offset),
                    None => Slot::Exhausted,
                };
            }
        }

        self.next
            .iter()
            .filter_map(|slot| match slot {
                Slot::At(at) => Some(at - self.pos),
                _ => None,
            })
            .min()
    }

    /// Delimiter under the read position, if any
    pub fn current_delimiter(&self) -> Option<Delimiter> {
        self.remaining().chars().next().and_then(Delimiter::classify)
    }

    /// Offset of `literal` from the read position
    pub fn find(&self, literal: &str) -> Option<usize> {
        self.remaining().find(literal)
    }

    /// Advance to just past the next occurrence of `literal`
    pub fn seek_past(&mut self, literal: &str) -> Result<(), DelimiterNotFound> {
        match self.find(literal) {
            Some(offset) => {
                self.advance(offset + literal.len());
                Ok(())
            }
            None => Err(DelimiterNotFound(literal.to_string())),
        }
    }

    /// 1-indexed line of the read position
    pub fn line_number(&self) -> usize {
        self.text[..self.pos].matches('\n').count() + 1
    }
}

/// Remove every line whose first non-blank character is the comment
/// marker, including its line break. Everything else is kept verbatim.
pub fn strip_comment_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
        .collect()
}

/// Stack of buffers; the last one is the active head
#[derive(Debug)]
pub struct BufferStack {
    buffers: Vec<CursorBuffer>,
    limit: usize,
}

impl BufferStack {
    pub fn new(limit: usize) -> Self {
        Self {
            buffers: Vec::new(),
            limit,
        }
    }

    /// Make `buffer` the new head
    pub fn push(&mut self, buffer: CursorBuffer) -> ConversionResult<()> {
        if self.buffers.len() >= self.limit {
            return Err(GrammafyError::StackDepthExceeded {
                limit: self.limit,
                source: buffer.origin().to_string(),
            });
        }
        tracing::debug!(
            origin = %buffer.origin(),
            depth = self.buffers.len() + 1,
            bytes = buffer.len(),
            "buffer_pushed"
        );
        self.buffers.push(buffer);
        Ok(())
    }

    /// Discard the head, exposing the buffer that triggered it
    pub fn pop(&mut self) -> Option<CursorBuffer> {
        let popped = self.buffers.pop();
        if let Some(ref buffer) = popped {
            tracing::debug!(origin = %buffer.origin(), depth = self.buffers.len(), "buffer_popped");
        }
        popped
    }

    pub fn head(&self) -> Option<&CursorBuffer> {
        self.buffers.last()
    }

    pub fn head_mut(&mut self) -> Option<&mut CursorBuffer> {
        self.buffers.last_mut()
    }

    /// The buffer one below the head
    pub fn parent(&self) -> Option<&CursorBuffer> {
        self.buffers.len().checked_sub(2).map(|i| &self.buffers[i])
    }

    pub fn depth(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Drop every buffer, ending the scan
    pub fn clear(&mut self) {
        self.buffers.clear();
    }

    /// Whether a file with this path is already being read
    pub fn contains_file(&self, path: &Path) -> bool {
        self.buffers
            .iter()
            .any(|b| b.origin().path() == Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(text: &str) -> CursorBuffer {
        CursorBuffer::new(text, BufferOrigin::Document("test.tex".to_string()))
    }

    #[test]
    fn test_strip_comment_lines() {
        let text = "first\n  % comment\nsecond % kept\n%last\n";
        assert_eq!(strip_comment_lines(text), "first\nsecond % kept\n");
    }

    #[test]
    fn test_strip_keeps_text_without_comments() {
        let text = "no comments\r\nat all";
        assert_eq!(strip_comment_lines(text), text);
    }

    #[test]
    fn test_delimiter_classify() {
        assert_eq!(Delimiter::classify('\\'), Some(Delimiter::Command));
        assert_eq!(Delimiter::classify('~'), Some(Delimiter::NonBreakingSpace));
        assert_eq!(Delimiter::classify('a'), None);
    }

    #[test]
    fn test_distance_to_next_delimiter() {
        let mut buf = buffer("abc{d}e$f");
        assert_eq!(buf.distance_to_next_delimiter(), Some(3));
        buf.advance(4);
        assert_eq!(buf.distance_to_next_delimiter(), Some(1));
        buf.advance(2);
        assert_eq!(buf.distance_to_next_delimiter(), Some(1));
        assert_eq!(buf.remaining(), "e$f");
        buf.advance(2);
        assert_eq!(buf.distance_to_next_delimiter(), None);
    }

    #[test]
    fn test_cache_follows_position() {
        let mut buf = buffer("a\\b\\c");
        assert_eq!(buf.distance_to_next_delimiter(), Some(1));
        buf.advance(2);
        assert_eq!(buf.distance_to_next_delimiter(), Some(1));
        assert_eq!(buf.current_delimiter(), None);
        buf.advance(1);
        assert_eq!(buf.current_delimiter(), Some(Delimiter::Command));
    }

    #[test]
    fn test_seek_past() {
        let mut buf = buffer("x = 5 \\] after");
        buf.seek_past("\\]").unwrap();
        assert_eq!(buf.remaining(), " after");
        assert_eq!(
            buf.seek_past("\\]"),
            Err(DelimiterNotFound("\\]".to_string()))
        );
        assert_eq!(buf.remaining(), " after");
    }

    #[test]
    fn test_backward_jump_exhausts() {
        let mut buf = buffer("0123456789");
        buf.jump_to(6).unwrap();
        let fault = buf.jump_to(2).unwrap_err();
        assert_eq!(fault, BackwardCursorFault { from: 6, to: 2 });
        assert!(buf.is_exhausted());
        assert_eq!(buf.distance_to_next_delimiter(), None);
    }

    #[test]
    fn test_advance_char_multibyte() {
        let mut buf = buffer("éa");
        buf.advance_char();
        assert_eq!(buf.remaining(), "a");
    }

    #[test]
    fn test_line_number() {
        let mut buf = buffer("one\ntwo\nthree");
        assert_eq!(buf.line_number(), 1);
        buf.seek_past("two").unwrap();
        assert_eq!(buf.line_number(), 2);
    }

    #[test]
    fn test_stack_push_pop() {
        let mut stack = BufferStack::new(4);
        stack.push(buffer("root")).unwrap();
        stack
            .push(CursorBuffer::new("child", BufferOrigin::Synthesized("footnote")))
            .unwrap();

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.head().unwrap().remaining(), "child");
        assert_eq!(stack.parent().unwrap().remaining(), "root");

        stack.pop();
        assert_eq!(stack.head().unwrap().remaining(), "root");
        assert!(stack.parent().is_none());
        stack.pop();
        assert!(stack.is_empty());
        assert!(stack.head().is_none());
    }

    #[test]
    fn test_stack_limit() {
        let mut stack = BufferStack::new(1);
        stack.push(buffer("root")).unwrap();
        let err = stack.push(buffer("again")).unwrap_err();
        assert!(matches!(err, GrammafyError::StackDepthExceeded { limit: 1, .. }));
    }

    #[test]
    fn test_contains_file() {
        let mut stack = BufferStack::new(4);
        let path = PathBuf::from("/doc/a.tex");
        stack
            .push(CursorBuffer::new("a", BufferOrigin::Include(path.clone())))
            .unwrap();
        assert!(stack.contains_file(&path));
        assert!(!stack.contains_file(Path::new("/doc/b.tex")));
    }
}
