//! The two registered commands: toggle the active editor, toggle all editors.

use super::DispatchResult;
use crate::Session;
use core_events::CommandEvent;
use core_state::EditorHost;
use tracing::debug;

pub(crate) fn handle_command(cmd: CommandEvent, session: &mut Session) -> DispatchResult {
    match cmd {
        CommandEvent::ToggleActive => {
            let Some(id) = session.workspace.active_editor() else {
                debug!(target: "overtype.toggle", command = cmd.name(), "no_active_editor");
                return DispatchResult::clean();
            };
            // Editors the binder never saw are bound on first toggle.
            let changed = session
                .overtype
                .toggle_editor(&mut session.workspace, id)
                .is_some();
            DispatchResult::from_dirty(changed)
        }
        CommandEvent::ToggleAll => {
            session.overtype.toggle_global(&mut session.workspace);
            session.refresh_indicator();
            DispatchResult::dirty()
        }
    }
}
