//! Rope-based text buffer abstraction.
//!
//! Positions are `(line, byte)` pairs where `byte` is an offset into the line
//! content excluding its terminator. Editing APIs take absolute byte offsets and
//! expect callers to stay on character boundaries.

use anyhow::Result;
use ropey::Rope;
use std::fmt;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A position inside a buffer expressed as (line index, byte offset within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("len_bytes", &self.rope.len_bytes())
            .field("lines", &self.rope.len_lines())
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of lines in the buffer (a trailing newline opens an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total byte length.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Line content without its `\n` / `\r\n` terminator.
    pub fn line_content(&self, idx: usize) -> Option<String> {
        let mut s = self.line(idx)?;
        if s.ends_with('\n') {
            s.pop();
            if s.ends_with('\r') {
                s.pop();
            }
        }
        Some(s)
    }

    /// Byte length of a line (excluding any terminator). Zero for out of range lines.
    pub fn line_byte_len(&self, idx: usize) -> usize {
        self.line_content(idx).map(|s| s.len()).unwrap_or(0)
    }

    /// True when `pos` sits at (or past) the end of its line's content.
    pub fn is_at_end_of_line(&self, pos: Position) -> bool {
        pos.byte >= self.line_byte_len(pos.line)
    }

    /// Position just past the last byte of the buffer.
    pub fn end_position(&self) -> Position {
        let last = self.line_count().saturating_sub(1);
        Position::new(last, self.line_byte_len(last))
    }

    /// Absolute byte offset of a position. Caller guarantees validity.
    pub fn absolute_byte_index(&self, pos: Position) -> usize {
        let line = pos.line.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_byte(line) + pos.byte
    }

    /// Inverse of `absolute_byte_index`, clamped to the buffer end.
    pub fn position_of_byte(&self, abs: usize) -> Position {
        let abs = abs.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(abs);
        let start = self.rope.line_to_byte(line);
        Position::new(line, abs - start)
    }

    /// Replace the absolute byte range `[start,end)` (clamped) with `text`.
    /// Returns the removed text.
    pub fn replace_bytes(&mut self, start: usize, end: usize, text: &str) -> String {
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total).max(s);
        let start_char = self.rope.byte_to_char(s);
        let end_char = self.rope.byte_to_char(e);
        let removed = self.rope.slice(start_char..end_char).to_string();
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
        if !text.is_empty() {
            self.rope.insert(start_char, text);
        }
        removed
    }
}

/// Grapheme helpers. Pure functions operating on a single line's content.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }
}
