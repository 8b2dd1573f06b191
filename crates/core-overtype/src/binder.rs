use core_events::EditorId;
use core_state::{EditorHost, ElementClass};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace, warn};

use crate::interceptor::InsertionInterceptor;
use crate::mode::{ModeRecord, ModeState, ModeTable};
use crate::OvertypeContext;

impl OvertypeContext {
    /// Patch `id` once. Returns true only when this call did the patching.
    ///
    /// Closed or unknown editors are ignored; an editor already in the table
    /// is left alone.
    pub fn bind<H: EditorHost + ?Sized>(&mut self, host: &mut H, id: EditorId) -> bool {
        if !host.is_open(id) {
            debug!(target: "overtype.bind", editor = %id, "bind_ignored_not_open");
            return false;
        }
        if self.is_bound(id) {
            trace!(target: "overtype.bind", editor = %id, "already_bound");
            return false;
        }

        let state = ModeState::new(self.global);
        let hook = InsertionInterceptor::new(id, state.clone());
        let subscription = match host.on_will_insert_text(id, Box::new(hook)) {
            Ok(sub) => sub,
            Err(e) => {
                debug!(target: "overtype.bind", editor = %id, error = %e, "subscribe_failed");
                return false;
            }
        };
        let table = Rc::downgrade(&self.modes);
        if let Err(e) = host.on_did_destroy(id, Box::new(move || release(&table, id))) {
            debug!(target: "overtype.bind", editor = %id, error = %e, "teardown_registration_failed");
            host.dispose_subscription(id, subscription);
            return false;
        }
        self.modes
            .borrow_mut()
            .install(id, ModeRecord { state, subscription });
        self.apply_style(host, id, self.global);
        info!(target: "overtype.bind", editor = %id, overtype = self.global, "editor_bound");
        true
    }

    /// Bind every open editor. Safe to call repeatedly.
    pub fn bind_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        host.open_editors()
            .into_iter()
            .filter(|&id| self.bind(host, id))
            .count()
    }

    /// Unsubscribe every interceptor, clear styling, and reset to insert mode.
    /// Editors closed in the meantime are skipped.
    pub fn deactivate<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let records: Vec<_> = self.modes.borrow_mut().drain().collect();
        let mut released = 0;
        for (id, record) in records {
            if host.dispose_subscription(id, record.subscription) {
                released += 1;
            }
            let _ = host.set_element_class(id, ElementClass::OVERTYPE_CURSOR, false);
        }
        self.global = false;
        info!(target: "overtype.bind", released, "deactivated");
        released
    }

    pub(crate) fn apply_style<H: EditorHost + ?Sized>(&self, host: &mut H, id: EditorId, value: bool) {
        if let Err(e) = host.set_element_class(id, ElementClass::OVERTYPE_CURSOR, value) {
            debug!(target: "overtype.bind", editor = %id, error = %e, "style_update_skipped");
        }
    }
}

/// Teardown run from the editor's disposal list.
fn release(table: &Weak<RefCell<ModeTable>>, id: EditorId) {
    let Some(table) = table.upgrade() else {
        return;
    };
    match table.try_borrow_mut() {
        Ok(mut t) => {
            if t.remove(id).is_some() {
                debug!(target: "overtype.bind", editor = %id, "editor_released");
            }
        }
        Err(_) => warn!(target: "overtype.bind", editor = %id, "release_while_table_borrowed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Workspace;

    #[test]
    fn bind_is_idempotent() {
        let mut ws = Workspace::new();
        let id = ws.open("a", "abc").unwrap();
        let mut ctx = OvertypeContext::new();
        assert!(ctx.bind(&mut ws, id));
        assert!(!ctx.bind(&mut ws, id));
        assert!(!ctx.bind(&mut ws, id));
        assert_eq!(ws.editor(id).unwrap().hook_count(), 1);
        assert_eq!(ctx.bound_count(), 1);
    }

    #[test]
    fn unknown_editor_is_ignored() {
        let mut ws = Workspace::new();
        let mut ctx = OvertypeContext::new();
        assert!(!ctx.bind(&mut ws, EditorId(77)));
        assert_eq!(ctx.bound_count(), 0);
    }

    #[test]
    fn close_releases_the_record() {
        let mut ws = Workspace::new();
        let id = ws.open("a", "abc").unwrap();
        let mut ctx = OvertypeContext::new();
        ctx.bind(&mut ws, id);
        ws.close(id);
        assert!(!ctx.is_bound(id));
        assert_eq!(ctx.bound_count(), 0);
    }

    #[test]
    fn teardown_after_context_dropped_is_harmless() {
        let mut ws = Workspace::new();
        let id = ws.open("a", "abc").unwrap();
        {
            let mut ctx = OvertypeContext::new();
            ctx.bind(&mut ws, id);
        }
        assert!(ws.close(id));
    }

    #[test]
    fn bind_all_then_deactivate() {
        let mut ws = Workspace::new();
        let a = ws.open("a", "abc").unwrap();
        let b = ws.open("b", "def").unwrap();
        let mut ctx = OvertypeContext::new();
        assert_eq!(ctx.bind_all(&mut ws), 2);
        assert_eq!(ctx.bind_all(&mut ws), 0, "re-activation does not double attach");
        ws.close(a);
        assert_eq!(ctx.deactivate(&mut ws), 1);
        assert_eq!(ws.editor(b).unwrap().hook_count(), 0);
        assert_eq!(ctx.bound_count(), 0);
        assert_eq!(ctx.bind_all(&mut ws), 1, "rebinding after deactivate works");
        assert_eq!(ws.editor(b).unwrap().hook_count(), 1);
    }
}
