//! Insertion interceptor: turns a typed insert into an overwrite.
//!
//! Runs as an `InsertHook`, strictly before the host applies the text. For a
//! typed insertion in an editor with overtype on, every collapsed cursor that
//! has a character ahead of it on its line is extended over that one grapheme
//! cluster. The host's default "replace selection" behavior then overwrites it.
//!
//! Left alone:
//! * non-empty selections (replace-selection already overwrites);
//! * cursors at end of line or end of buffer (nothing ahead; insert);
//! * selections that no longer fit the buffer (skipped, logged at debug).
//!
//! The new selection list is built in full and assigned once, so the host
//! never sees a partially rewritten set.

use core_events::{EditorId, WillInsertText};
use core_state::{InsertHook, Selection};
use core_text::{Buffer, Position};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::mode::ModeState;

/// Counts reported by one interception pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterceptOutcome {
    /// Collapsed cursors extended over the next character.
    pub extended: usize,
    /// Selections skipped because they could not be read.
    pub skipped: usize,
}

pub struct InsertionInterceptor {
    editor: EditorId,
    mode: Rc<ModeState>,
}

impl InsertionInterceptor {
    pub fn new(editor: EditorId, mode: Rc<ModeState>) -> Self {
        Self { editor, mode }
    }

    /// Decide and apply the rewrite. Returns `None` when the event passes through.
    pub fn intercept(
        &self,
        event: &WillInsertText,
        buffer: &Buffer,
        selections: &mut Vec<Selection>,
    ) -> Option<InterceptOutcome> {
        if !self.mode.get() {
            return None;
        }
        if event.editor != self.editor {
            debug!(target: "overtype.intercept", editor = %self.editor, event_editor = %event.editor, "foreign_event_ignored");
            return None;
        }
        if !event.origin.is_typed() {
            trace!(target: "overtype.intercept", editor = %self.editor, origin = event.origin.as_str(), "non_typed_passthrough");
            return None;
        }
        let (planned, outcome) = extend_collapsed(buffer, selections);
        if outcome.extended > 0 {
            *selections = planned;
        }
        Some(outcome)
    }
}

impl InsertHook for InsertionInterceptor {
    fn will_insert(&self, event: &WillInsertText, buffer: &Buffer, selections: &mut Vec<Selection>) {
        if let Some(outcome) = self.intercept(event, buffer, selections) {
            trace!(
                target: "overtype.intercept",
                editor = %self.editor,
                extended = outcome.extended,
                skipped = outcome.skipped,
                size_bytes = event.text.len(),
                "overwrite_prepared"
            );
        }
    }
}

/// Plan the overwrite for every selection independently.
///
/// A cursor whose extension would reach into a sibling selection stays
/// collapsed: the sibling keeps its own replacement and the cursor inserts.
pub fn extend_collapsed(buffer: &Buffer, selections: &[Selection]) -> (Vec<Selection>, InterceptOutcome) {
    let mut outcome = InterceptOutcome::default();
    let planned = selections
        .iter()
        .enumerate()
        .map(|(idx, sel)| {
            if !sel.is_empty() {
                return *sel;
            }
            match sel.next_head(buffer) {
                Ok(Some(head)) if overlaps_sibling(selections, idx, sel.head, head) => {
                    trace!(target: "overtype.intercept", line = sel.head.line, byte = sel.head.byte, "extension_blocked_by_sibling");
                    *sel
                }
                Ok(Some(head)) => {
                    outcome.extended += 1;
                    Selection::new(sel.anchor, head)
                }
                Ok(None) => *sel,
                Err(e) => {
                    outcome.skipped += 1;
                    debug!(target: "overtype.intercept", error = %e, "selection_skipped");
                    *sel
                }
            }
        })
        .collect();
    (planned, outcome)
}

/// Would `[start,end)` intersect any selection other than `selections[idx]`?
fn overlaps_sibling(selections: &[Selection], idx: usize, start: Position, end: Position) -> bool {
    selections.iter().enumerate().any(|(j, other)| {
        j != idx
            && if other.is_empty() {
                start < other.head && other.head < end
            } else {
                other.start() < end && start < other.end()
            }
    })
}
