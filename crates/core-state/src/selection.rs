//! Selection model shared by the host and the overtype interceptor.
//!
//! A `Selection` is an `anchor` and a `head`. When they are equal the selection
//! is a collapsed cursor. The head is the moving end: extending a selection to
//! the right moves only the head.

use core_text::{Buffer, Position, grapheme};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

/// Why a selection cannot be read against its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("line {line} out of range ({line_count} lines)")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("byte {byte} beyond end of line {line} (len {len})")]
    ByteOutOfRange { line: usize, byte: usize, len: usize },
    #[error("byte {byte} of line {line} is not a char boundary")]
    NotCharBoundary { line: usize, byte: usize },
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection (plain cursor).
    pub fn cursor(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Check both ends against the buffer.
    pub fn validate(&self, buffer: &Buffer) -> Result<(), SelectionError> {
        check_position(buffer, self.anchor)?;
        check_position(buffer, self.head)
    }

    /// Half-open absolute byte range `[start,end)`.
    pub fn byte_range(&self, buffer: &Buffer) -> Result<(usize, usize), SelectionError> {
        self.validate(buffer)?;
        Ok((
            buffer.absolute_byte_index(self.start()),
            buffer.absolute_byte_index(self.end()),
        ))
    }

    /// Head one grapheme cluster to the right, or `None` at end of line / buffer.
    pub fn next_head(&self, buffer: &Buffer) -> Result<Option<Position>, SelectionError> {
        check_position(buffer, self.head)?;
        if buffer.is_at_end_of_line(self.head) {
            return Ok(None);
        }
        let content = buffer.line_content(self.head.line).unwrap_or_default();
        let next = grapheme::next_boundary(&content, self.head.byte);
        Ok(Some(Position::new(self.head.line, next)))
    }
}

/// Verify that `pos` names a real line and a char boundary within it.
pub fn check_position(buffer: &Buffer, pos: Position) -> Result<(), SelectionError> {
    let line_count = buffer.line_count();
    let Some(content) = buffer.line_content(pos.line) else {
        return Err(SelectionError::LineOutOfRange {
            line: pos.line,
            line_count,
        });
    };
    if pos.byte > content.len() {
        return Err(SelectionError::ByteOutOfRange {
            line: pos.line,
            byte: pos.byte,
            len: content.len(),
        });
    }
    if !content.is_char_boundary(pos.byte) {
        return Err(SelectionError::NotCharBoundary {
            line: pos.line,
            byte: pos.byte,
        });
    }
    Ok(())
}

/// Sort by start and merge selections that overlap or coincide.
///
/// Touching ranges (`[2,3)` and `[3,4)`) stay separate so that two adjacent
/// cursors extended by one character each keep their own insertion point.
pub fn normalize(selections: &mut Vec<Selection>) {
    if selections.len() < 2 {
        return;
    }
    selections.sort_by_key(|s| (s.start(), s.end()));
    let mut out: Vec<Selection> = Vec::with_capacity(selections.len());
    for sel in selections.drain(..) {
        if let Some(prev) = out.last_mut() {
            let same = prev.start() == sel.start() && prev.end() == sel.end();
            if same || sel.start() < prev.end() {
                let end = prev.end().max(sel.end());
                *prev = Selection::new(prev.start(), end);
                continue;
            }
        }
        out.push(sel);
    }
    *selections = out;
}
