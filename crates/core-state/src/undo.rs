use core_text::Buffer;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use tracing::trace;

use crate::Selection;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A full-state snapshot for undo/redo: buffer clone plus every selection.
#[derive(Clone)]
pub struct EditSnapshot {
    pub buffer: Buffer,
    pub selections: Vec<Selection>,
    /// Content hash of the buffer at snapshot capture.
    pub hash: u64,
}

/// Snapshot stacks for one editor. One insertion (including an overwrite that
/// first absorbed the character ahead) is one snapshot, so undo restores the
/// pre-typing text and cursors in a single step.
pub struct UndoEngine {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    snapshots_skipped: u64,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            snapshots_skipped: 0,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn snapshots_skipped(&self) -> u64 {
        self.snapshots_skipped
    }

    pub fn push_snapshot(&mut self, buffer: &Buffer, selections: &[Selection]) {
        let current_hash = buffer_hash(buffer);
        if let Some(last) = self.undo_stack.last()
            && last.hash == current_hash
            && last.selections == selections
        {
            self.snapshots_skipped += 1;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), hash = current_hash, "snapshot_dedupe_skip");
            return;
        }
        self.undo_stack.push(EditSnapshot {
            buffer: buffer.clone(),
            selections: selections.to_vec(),
            hash: current_hash,
        });
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), hash = current_hash, "push_snapshot");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, buffer: &mut Buffer, selections: &mut Vec<Selection>) -> bool {
        let Some(last) = self.undo_stack.pop() else {
            return false;
        };
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        self.redo_stack.push(EditSnapshot {
            buffer: buffer.clone(),
            selections: selections.clone(),
            hash: buffer_hash(buffer),
        });
        *buffer = last.buffer;
        *selections = last.selections;
        true
    }

    pub fn redo(&mut self, buffer: &mut Buffer, selections: &mut Vec<Selection>) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
        self.undo_stack.push(EditSnapshot {
            buffer: buffer.clone(),
            selections: selections.clone(),
            hash: buffer_hash(buffer),
        });
        *buffer = next.buffer;
        *selections = next.selections;
        true
    }
}

fn buffer_hash(buf: &Buffer) -> u64 {
    let mut h = DefaultHasher::new();
    for i in 0..buf.line_count() {
        if let Some(l) = buf.line(i) {
            h.write(l.as_bytes());
        }
    }
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;

    #[test]
    fn identical_snapshot_is_skipped() {
        let buf = Buffer::from_str("t", "abc").unwrap();
        let sels = vec![Selection::cursor(Position::origin())];
        let mut engine = UndoEngine::new();
        engine.push_snapshot(&buf, &sels);
        engine.push_snapshot(&buf, &sels);
        assert_eq!(engine.undo_depth(), 1);
        assert_eq!(engine.snapshots_skipped(), 1);
    }

    #[test]
    fn undo_then_redo_restores_both_sides() {
        let mut buf = Buffer::from_str("t", "abc").unwrap();
        let mut sels = vec![Selection::cursor(Position::origin())];
        let mut engine = UndoEngine::new();
        engine.push_snapshot(&buf, &sels);
        buf.replace_bytes(0, 1, "Z");
        sels = vec![Selection::cursor(Position::new(0, 1))];

        assert!(engine.undo(&mut buf, &mut sels));
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(sels[0].head, Position::origin());
        assert_eq!(engine.redo_depth(), 1);

        assert!(engine.redo(&mut buf, &mut sels));
        assert_eq!(buf.to_string(), "Zbc");
        assert_eq!(sels[0].head, Position::new(0, 1));
        assert!(!engine.redo(&mut buf, &mut sels));
    }

    #[test]
    fn history_is_capped() {
        let mut buf = Buffer::from_str("t", "").unwrap();
        let sels = vec![Selection::cursor(Position::origin())];
        let mut engine = UndoEngine::new();
        for _ in 0..(UNDO_HISTORY_MAX + 5) {
            engine.push_snapshot(&buf, &sels);
            buf.replace_bytes(0, 0, "x");
        }
        assert_eq!(engine.undo_depth(), UNDO_HISTORY_MAX);
    }
}
