use core_events::EditorId;
use core_state::EditorHost;
use tracing::{debug, info};

use crate::OvertypeContext;

impl OvertypeContext {
    /// Flip overtype for `id`, binding it first if needed. `None` when the
    /// editor is not open.
    pub fn toggle_editor<H: EditorHost + ?Sized>(&mut self, host: &mut H, id: EditorId) -> Option<bool> {
        if !self.ensure_bound(host, id) {
            return None;
        }
        let value = !self.is_overtype(id);
        self.set_editor(host, id, value);
        Some(value)
    }

    /// Force overtype for `id` to `value`, binding it first if needed.
    /// Returns false when the editor is not open.
    pub fn set_editor<H: EditorHost + ?Sized>(&mut self, host: &mut H, id: EditorId, value: bool) -> bool {
        if !self.ensure_bound(host, id) {
            return false;
        }
        let previous = self.modes.borrow().set_overtype(id, value);
        self.apply_style(host, id, value);
        if previous != Some(value) {
            info!(target: "overtype.toggle", editor = %id, overtype = value, "editor_mode_set");
            self.notify_editor(id, value);
        }
        true
    }

    /// Flip the global flag and force every open editor to it. Returns the new flag.
    pub fn toggle_global<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.global = !self.global;
        let value = self.global;
        let editors = host.open_editors();
        for &id in &editors {
            self.set_editor(host, id, value);
        }
        info!(target: "overtype.toggle", overtype = value, editors = editors.len(), "global_mode_set");
        self.notify_global(value);
        value
    }

    fn ensure_bound<H: EditorHost + ?Sized>(&mut self, host: &mut H, id: EditorId) -> bool {
        self.bind(host, id);
        let bound = self.is_bound(id);
        if !bound {
            debug!(target: "overtype.toggle", editor = %id, "toggle_ignored_no_editor");
        }
        bound
    }
}
