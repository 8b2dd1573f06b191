//! One open editor: buffer, selections, element classes, insert hooks and the
//! disposal list.

use core_events::{EditorId, WillInsertText};
use core_text::{Buffer, Position};
use tracing::{debug, trace};

use crate::host::{ElementClass, InsertHook, SubscriptionId, Teardown};
use crate::selection::{self, Selection};
use crate::undo::UndoEngine;

pub struct EditorState {
    id: EditorId,
    buffer: Buffer,
    selections: Vec<Selection>,
    classes: ElementClass,
    hooks: Vec<(SubscriptionId, Box<dyn InsertHook>)>,
    disposables: Vec<Teardown>,
    undo: UndoEngine,
}

impl EditorState {
    pub fn new(id: EditorId, buffer: Buffer) -> Self {
        Self {
            id,
            buffer,
            selections: vec![Selection::cursor(Position::origin())],
            classes: ElementClass::empty(),
            hooks: Vec::new(),
            disposables: Vec::new(),
            undo: UndoEngine::new(),
        }
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Replace all selections. An empty list resets to a cursor at the origin.
    pub fn set_selections(&mut self, mut selections: Vec<Selection>) {
        if selections.is_empty() {
            selections.push(Selection::cursor(Position::origin()));
        }
        selection::normalize(&mut selections);
        self.selections = selections;
    }

    pub fn set_cursors(&mut self, cursors: &[Position]) {
        self.set_selections(cursors.iter().copied().map(Selection::cursor).collect());
    }

    pub fn classes(&self) -> ElementClass {
        self.classes
    }

    pub(crate) fn set_class(&mut self, class: ElementClass, enabled: bool) {
        self.classes.set(class, enabled);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub(crate) fn subscribe(&mut self, id: SubscriptionId, hook: Box<dyn InsertHook>) {
        self.hooks.push((id, hook));
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(sub, _)| *sub != id);
        self.hooks.len() != before
    }

    pub(crate) fn add_disposable(&mut self, teardown: Teardown) {
        self.disposables.push(teardown);
    }

    /// Run the insert pipeline: hooks first, then one undo snapshot, then the
    /// default "replace every selection with `text`" behavior.
    ///
    /// The snapshot records the selections as they were before any hook ran,
    /// so undo puts the cursor back where the user typed.
    pub fn insert(&mut self, event: &WillInsertText) {
        let before = self.selections.clone();
        for (_, hook) in &self.hooks {
            hook.will_insert(event, &self.buffer, &mut self.selections);
        }
        selection::normalize(&mut self.selections);
        if event.text.is_empty() {
            self.selections = before;
            return;
        }
        self.undo.push_snapshot(&self.buffer, &before);
        self.apply_insertion(&event.text);
        trace!(
            target: "host",
            editor = %self.id,
            origin = event.origin.as_str(),
            size_bytes = event.text.len(),
            selections = self.selections.len(),
            "insert_applied"
        );
    }

    fn apply_insertion(&mut self, text: &str) {
        let mut ranges = Vec::with_capacity(self.selections.len());
        for sel in &self.selections {
            match sel.byte_range(&self.buffer) {
                Ok(range) => ranges.push(range),
                Err(e) => debug!(target: "host", editor = %self.id, error = %e, "stale_selection_dropped"),
            }
        }
        if ranges.is_empty() {
            return;
        }
        ranges.sort_unstable();

        // Cursor after each insertion, accounting for the growth of earlier ranges.
        let inserted = text.len() as i64;
        let mut shift = 0i64;
        let mut heads = Vec::with_capacity(ranges.len());
        for &(start, end) in &ranges {
            heads.push((start as i64 + shift + inserted) as usize);
            shift += inserted - (end - start) as i64;
        }
        for &(start, end) in ranges.iter().rev() {
            self.buffer.replace_bytes(start, end, text);
        }
        self.selections = heads
            .into_iter()
            .map(|abs| Selection::cursor(self.buffer.position_of_byte(abs)))
            .collect();
    }

    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.buffer, &mut self.selections)
    }

    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.buffer, &mut self.selections)
    }

    /// Drop every hook, then run the disposal list once.
    pub(crate) fn dispose(mut self) {
        self.hooks.clear();
        for teardown in self.disposables.drain(..) {
            teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::InsertOrigin;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn editor(text: &str) -> EditorState {
        EditorState::new(EditorId(1), Buffer::from_str("t", text).unwrap())
    }

    fn typed(text: &str) -> WillInsertText {
        WillInsertText::new(EditorId(1), text, InsertOrigin::Keystroke)
    }

    #[test]
    fn plain_insert_at_cursor() {
        let mut ed = editor("abXcd");
        ed.set_cursors(&[Position::new(0, 2)]);
        ed.insert(&typed("Y"));
        assert_eq!(ed.text(), "abYXcd");
        assert_eq!(ed.selections(), &[Selection::cursor(Position::new(0, 3))]);
    }

    #[test]
    fn selection_is_replaced() {
        let mut ed = editor("abcdef");
        ed.set_selections(vec![Selection::new(Position::new(0, 2), Position::new(0, 4))]);
        ed.insert(&typed("Y"));
        assert_eq!(ed.text(), "abYef");
    }

    #[test]
    fn multi_cursor_insert_shifts_later_cursors() {
        let mut ed = editor("ab\ncd");
        ed.set_cursors(&[Position::new(0, 1), Position::new(1, 1), Position::new(0, 2)]);
        ed.insert(&typed("--"));
        assert_eq!(ed.text(), "a--b--\nc--d");
        assert_eq!(
            ed.selections(),
            &[
                Selection::cursor(Position::new(0, 3)),
                Selection::cursor(Position::new(0, 6)),
                Selection::cursor(Position::new(1, 3)),
            ]
        );
    }

    struct SelectAll;
    impl InsertHook for SelectAll {
        fn will_insert(&self, _e: &WillInsertText, buffer: &Buffer, selections: &mut Vec<Selection>) {
            *selections = vec![Selection::new(Position::origin(), buffer.end_position())];
        }
    }

    #[test]
    fn hooks_run_before_text_is_applied() {
        let mut ed = editor("old");
        ed.subscribe(SubscriptionId(1), Box::new(SelectAll));
        ed.insert(&typed("new"));
        assert_eq!(ed.text(), "new");
        assert!(ed.unsubscribe(SubscriptionId(1)));
        assert!(!ed.unsubscribe(SubscriptionId(1)));
        ed.insert(&typed("!"));
        assert_eq!(ed.text(), "new!");
    }

    #[test]
    fn undo_restores_text_and_cursor_in_one_step() {
        let mut ed = editor("abc");
        ed.set_cursors(&[Position::new(0, 1)]);
        ed.insert(&typed("Z"));
        assert_eq!(ed.undo_depth(), 1);
        assert!(ed.undo());
        assert_eq!(ed.text(), "abc");
        assert_eq!(ed.selections(), &[Selection::cursor(Position::new(0, 1))]);
        assert!(ed.redo());
        assert_eq!(ed.text(), "aZbc");
    }

    #[test]
    fn dispose_runs_teardowns_once() {
        let hits = Rc::new(Cell::new(0));
        let mut ed = editor("x");
        let h = hits.clone();
        ed.add_disposable(Box::new(move || h.set(h.get() + 1)));
        ed.dispose();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn empty_insert_is_not_recorded() {
        let mut ed = editor("abc");
        ed.insert(&typed(""));
        assert_eq!(ed.undo_depth(), 0);
        assert_eq!(ed.text(), "abc");
    }
}
