//! In-memory editor host: the set of open editors plus focus.

use anyhow::Result;
use core_events::{EditorId, InsertOrigin, WillInsertText};
use core_text::Buffer;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::editor::EditorState;
use crate::host::{EditorHost, ElementClass, HostError, InsertHook, SubscriptionId, Teardown};

#[derive(Default)]
pub struct Workspace {
    editors: BTreeMap<EditorId, EditorState>,
    active: Option<EditorId>,
    next_editor: u64,
    next_subscription: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new editor over `content`; it becomes the active editor.
    pub fn open(&mut self, name: &str, content: &str) -> Result<EditorId> {
        self.next_editor += 1;
        let id = EditorId(self.next_editor);
        let buffer = Buffer::from_str(name, content)?;
        self.editors.insert(id, EditorState::new(id, buffer));
        info!(target: "host", editor = %id, name, size_bytes = content.len(), "editor_opened");
        self.focus(id);
        Ok(id)
    }

    /// Close an editor, dropping its hooks and running its disposal list.
    pub fn close(&mut self, id: EditorId) -> bool {
        let Some(editor) = self.editors.remove(&id) else {
            return false;
        };
        editor.dispose();
        if self.active == Some(id) {
            self.active = None;
            if let Some(&next) = self.editors.keys().next_back() {
                self.focus(next);
            }
        }
        info!(target: "host", editor = %id, remaining = self.editors.len(), "editor_closed");
        true
    }

    pub fn focus(&mut self, id: EditorId) -> bool {
        if !self.editors.contains_key(&id) {
            return false;
        }
        if let Some(prev) = self.active.and_then(|a| self.editors.get_mut(&a)) {
            prev.set_class(ElementClass::FOCUSED, false);
        }
        if let Some(ed) = self.editors.get_mut(&id) {
            ed.set_class(ElementClass::FOCUSED, true);
        }
        self.active = Some(id);
        true
    }

    pub fn editor(&self, id: EditorId) -> Option<&EditorState> {
        self.editors.get(&id)
    }

    pub fn editor_mut(&mut self, id: EditorId) -> Option<&mut EditorState> {
        self.editors.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn text(&self, id: EditorId) -> Option<String> {
        self.editors.get(&id).map(EditorState::text)
    }

    /// Insert `text` into `id` through the hook pipeline.
    pub fn insert_text(
        &mut self,
        id: EditorId,
        text: &str,
        origin: InsertOrigin,
    ) -> Result<(), HostError> {
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(HostError::UnknownEditor(id))?;
        editor.insert(&WillInsertText::new(id, text, origin));
        Ok(())
    }
}

impl EditorHost for Workspace {
    fn open_editors(&self) -> Vec<EditorId> {
        self.editors.keys().copied().collect()
    }

    fn active_editor(&self) -> Option<EditorId> {
        self.active
    }

    fn is_open(&self, id: EditorId) -> bool {
        self.editors.contains_key(&id)
    }

    fn has_element_class(&self, id: EditorId, class: ElementClass) -> bool {
        self.editors
            .get(&id)
            .is_some_and(|ed| ed.classes().contains(class))
    }

    fn set_element_class(
        &mut self,
        id: EditorId,
        class: ElementClass,
        enabled: bool,
    ) -> Result<(), HostError> {
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(HostError::UnknownEditor(id))?;
        editor.set_class(class, enabled);
        Ok(())
    }

    fn on_will_insert_text(
        &mut self,
        id: EditorId,
        hook: Box<dyn InsertHook>,
    ) -> Result<SubscriptionId, HostError> {
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(HostError::UnknownEditor(id))?;
        self.next_subscription += 1;
        let sub = SubscriptionId(self.next_subscription);
        editor.subscribe(sub, hook);
        debug!(target: "host", editor = %id, subscription = sub.0, "insert_hook_subscribed");
        Ok(sub)
    }

    fn dispose_subscription(&mut self, id: EditorId, subscription: SubscriptionId) -> bool {
        self.editors
            .get_mut(&id)
            .is_some_and(|ed| ed.unsubscribe(subscription))
    }

    fn on_did_destroy(&mut self, id: EditorId, teardown: Teardown) -> Result<(), HostError> {
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(HostError::UnknownEditor(id))?;
        editor.add_disposable(teardown);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn open_focus_close_cycle() {
        let mut ws = Workspace::new();
        let a = ws.open("a", "one").unwrap();
        let b = ws.open("b", "two").unwrap();
        assert_eq!(ws.open_editors(), vec![a, b]);
        assert_eq!(ws.active_editor(), Some(b));
        assert!(ws.has_element_class(b, ElementClass::FOCUSED));
        assert!(!ws.has_element_class(a, ElementClass::FOCUSED));

        assert!(ws.focus(a));
        assert!(ws.has_element_class(a, ElementClass::FOCUSED));
        assert!(!ws.has_element_class(b, ElementClass::FOCUSED));

        assert!(ws.close(a));
        assert_eq!(ws.active_editor(), Some(b));
        assert!(!ws.close(a), "second close is a no-op");
        assert!(ws.close(b));
        assert_eq!(ws.active_editor(), None);
        assert!(ws.is_empty());
    }

    #[test]
    fn teardown_runs_on_close_only() {
        let mut ws = Workspace::new();
        let id = ws.open("a", "x").unwrap();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        ws.on_did_destroy(id, Box::new(move || f.set(true))).unwrap();
        ws.insert_text(id, "y", InsertOrigin::Keystroke).unwrap();
        assert!(!fired.get());
        ws.close(id);
        assert!(fired.get());
    }

    #[test]
    fn unknown_editor_is_an_error_not_a_panic() {
        let mut ws = Workspace::new();
        let ghost = EditorId(42);
        assert_eq!(
            ws.insert_text(ghost, "x", InsertOrigin::Keystroke),
            Err(HostError::UnknownEditor(ghost))
        );
        assert!(ws.set_element_class(ghost, ElementClass::OVERTYPE_CURSOR, true).is_err());
        assert!(!ws.dispose_subscription(ghost, SubscriptionId(1)));
        assert!(!ws.has_element_class(ghost, ElementClass::OVERTYPE_CURSOR));
    }
}
