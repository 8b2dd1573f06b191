//! Editor lifecycle events and text entry.

use super::DispatchResult;
use crate::Session;
use core_events::{EditorId, InsertOrigin};
use core_state::EditorHost;
use tracing::{debug, warn};

pub(crate) fn handle_opened(id: EditorId, session: &mut Session) -> DispatchResult {
    DispatchResult::from_dirty(session.overtype.bind(&mut session.workspace, id))
}

pub(crate) fn handle_closed(id: EditorId, session: &mut Session) -> DispatchResult {
    DispatchResult::from_dirty(session.workspace.close(id))
}

pub(crate) fn handle_focused(id: EditorId, session: &mut Session) -> DispatchResult {
    DispatchResult::from_dirty(session.workspace.focus(id))
}

pub(crate) fn handle_input(text: &str, origin: InsertOrigin, session: &mut Session) -> DispatchResult {
    let Some(id) = session.workspace.active_editor() else {
        debug!(target: "host", origin = origin.as_str(), "input_without_editor");
        return DispatchResult::clean();
    };
    match session.workspace.insert_text(id, text, origin) {
        Ok(()) => DispatchResult::from_dirty(!text.is_empty()),
        Err(e) => {
            warn!(target: "host", error = %e, "insert_failed");
            DispatchResult::clean()
        }
    }
}
