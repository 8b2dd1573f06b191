//! Dispatcher applying host `Event`s to a `Session`.
//!
//! Sub-modules:
//! * `editor`  - editor lifecycle and text entry
//! * `command` - the two toggle commands
//! * `status`  - status bar service, indicator setting and clicks
//!
//! Every handler runs to completion before the next event is taken, so no
//! overtype state is ever observed half-updated.

use crate::Session;
use core_events::Event;
use tracing::{debug, info};

mod command;
mod editor;
mod status;

/// Result of dispatching a single `Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Something visible changed (text, cursor styling or the status line).
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
    pub(crate) fn from_dirty(dirty: bool) -> Self {
        if dirty { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an event to the session.
pub fn dispatch(event: Event, session: &mut Session) -> DispatchResult {
    session.hooks().pre_handle(&event);
    let result = match &event {
        Event::EditorOpened(_) | Event::Command(_) if !session.is_active() => {
            debug!(target: "runtime", kind = event.kind(), "ignored_while_inactive");
            DispatchResult::clean()
        }
        Event::EditorOpened(id) => editor::handle_opened(*id, session),
        Event::EditorClosed(id) => editor::handle_closed(*id, session),
        Event::EditorFocused(id) => editor::handle_focused(*id, session),
        Event::Input { text, origin } => editor::handle_input(text, *origin, session),
        Event::Command(cmd) => command::handle_command(*cmd, session),
        Event::ConfigChanged(change) => status::handle_setting(*change, session),
        Event::StatusBar(service) => status::handle_service(*service, session),
        Event::IndicatorClick(button) => status::handle_click(*button, session),
        Event::Activate => {
            session.set_active(true);
            let bound = session.overtype.bind_all(&mut session.workspace);
            let enabled = session.config.show_indicator();
            let shown = session.sync_indicator(enabled);
            info!(target: "overtype.bind", bound, "activated");
            DispatchResult::from_dirty(bound > 0 || shown)
        }
        Event::Deactivate => {
            session.set_active(false);
            let released = session.overtype.deactivate(&mut session.workspace);
            session.refresh_indicator();
            debug!(target: "runtime", released, "deactivate_dispatched");
            DispatchResult::dirty()
        }
        Event::Shutdown => DispatchResult::quit(),
    };
    session.hooks().post_handle(&event);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::Config;
    use core_events::{CommandEvent, InsertOrigin, ServiceEvent};
    use core_text::Position;

    fn session_with(text: &str) -> Session {
        let mut s = Session::new(Config::default());
        s.open_editor("a", text).unwrap();
        s
    }

    #[test]
    fn shutdown_quits() {
        let mut s = Session::new(Config::default());
        let r = dispatch(Event::Shutdown, &mut s);
        assert!(r.quit && r.dirty);
    }

    #[test]
    fn activate_binds_editors_opened_while_inactive() {
        let mut s = Session::new(Config::default());
        s.workspace.open("x", "abc").unwrap();
        s.workspace.open("y", "def").unwrap();
        assert_eq!(s.overtype.bound_count(), 0);
        assert!(dispatch(Event::Activate, &mut s).dirty);
        assert_eq!(s.overtype.bound_count(), 2);
        assert!(!dispatch(Event::Activate, &mut s).dirty, "second activation is idempotent");
    }

    #[test]
    fn deactivate_then_typing_inserts() {
        let mut s = session_with("abXcd");
        s.set_cursors(&[Position::new(0, 2)]);
        dispatch(Event::Command(CommandEvent::ToggleActive), &mut s);
        dispatch(Event::Deactivate, &mut s);
        assert_eq!(s.overtype.bound_count(), 0);
        dispatch(
            Event::Input {
                text: "Y".into(),
                origin: InsertOrigin::Keystroke,
            },
            &mut s,
        );
        let id = s.active_editor().unwrap();
        assert_eq!(s.workspace.text(id).unwrap(), "abYXcd");
    }

    #[test]
    fn deactivation_holds_until_activate() {
        let mut s = session_with("abcd");
        dispatch(Event::Deactivate, &mut s);
        assert!(!s.is_active());

        let late = s.workspace.open("late", "wxyz").unwrap();
        assert_eq!(dispatch(Event::EditorOpened(late), &mut s), DispatchResult::clean());
        assert_eq!(
            dispatch(Event::Command(CommandEvent::ToggleActive), &mut s),
            DispatchResult::clean()
        );
        assert_eq!(
            dispatch(Event::Command(CommandEvent::ToggleAll), &mut s),
            DispatchResult::clean()
        );
        assert_eq!(s.overtype.bound_count(), 0);
        assert!(!s.overtype.global());

        dispatch(
            Event::Input {
                text: "Y".into(),
                origin: InsertOrigin::Keystroke,
            },
            &mut s,
        );
        assert_eq!(s.workspace.text(late).unwrap(), "Ywxyz");

        dispatch(Event::Activate, &mut s);
        assert!(s.is_active());
        assert_eq!(s.overtype.bound_count(), 2);
    }

    #[test]
    fn deactivate_resets_indicator() {
        let mut s = session_with("x");
        dispatch(Event::StatusBar(ServiceEvent::Provided), &mut s);
        dispatch(Event::Command(CommandEvent::ToggleAll), &mut s);
        assert_eq!(s.status_line().unwrap(), "[Overtype]");
        dispatch(Event::Deactivate, &mut s);
        assert_eq!(s.status_line().unwrap(), "Insert");
    }
}
