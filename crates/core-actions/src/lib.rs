//! Runtime glue: a `Session` owning the host, the overtype context, config and
//! the status bar, plus the event dispatcher and the replay script format.

use anyhow::Result;
use core_config::Config;
use core_events::{EditorId, Event, EventHooks, NoopEventHooks};
use core_overtype::OvertypeContext;
use core_render::{IndicatorSlot, StatusBar, TileStrip};
use core_state::{EditorHost, EditorState, Selection, Workspace};
use core_text::Position;

pub mod dispatcher;
pub mod script;

pub use dispatcher::{DispatchResult, dispatch};
pub use script::{ScriptError, Step, parse_script};

pub struct Session {
    pub workspace: Workspace,
    pub overtype: OvertypeContext,
    pub config: Config,
    /// Present while the host provides a status bar service.
    pub status_bar: Option<TileStrip>,
    pub indicator: IndicatorSlot,
    /// Cleared by `Event::Deactivate`; binding and toggling wait for `Event::Activate`.
    active: bool,
    hooks: Box<dyn EventHooks>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            workspace: Workspace::new(),
            overtype: OvertypeContext::new(),
            config,
            status_bar: None,
            indicator: IndicatorSlot::new(),
            active: true,
            hooks: Box::new(NoopEventHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Box<dyn EventHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn hooks(&self) -> &dyn EventHooks {
        self.hooks.as_ref()
    }

    /// Open an editor in the host and report it, which binds it.
    pub fn open_editor(&mut self, name: &str, text: &str) -> Result<EditorId> {
        let id = self.workspace.open(name, text)?;
        dispatch(Event::EditorOpened(id), self);
        Ok(id)
    }

    pub fn active_editor(&self) -> Option<EditorId> {
        self.workspace.active_editor()
    }

    /// Place collapsed cursors in the active editor. False without one.
    pub fn set_cursors(&mut self, cursors: &[Position]) -> bool {
        self.with_active(|ed| ed.set_cursors(cursors)).is_some()
    }

    pub fn select(&mut self, anchor: Position, head: Position) -> bool {
        self.with_active(|ed| ed.set_selections(vec![Selection::new(anchor, head)]))
            .is_some()
    }

    pub fn undo(&mut self) -> bool {
        self.with_active(|ed| ed.undo()).unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool {
        self.with_active(|ed| ed.redo()).unwrap_or(false)
    }

    fn with_active<R>(&mut self, f: impl FnOnce(&mut EditorState) -> R) -> Option<R> {
        let id = self.workspace.active_editor()?;
        self.workspace.editor_mut(id).map(f)
    }

    /// Rendered status bar tiles, or `None` while no service is present.
    pub fn status_line(&self) -> Option<String> {
        self.status_bar.as_ref().map(TileStrip::format_line)
    }

    /// Create or destroy the indicator to match the service and setting.
    pub(crate) fn sync_indicator(&mut self, enabled: bool) -> bool {
        let priority = self.config.indicator_priority();
        let global = self.overtype.global();
        let bar = self.status_bar.as_mut().map(|b| b as &mut dyn StatusBar);
        self.indicator.sync(bar, enabled, priority, global)
    }

    pub(crate) fn refresh_indicator(&mut self) {
        let global = self.overtype.global();
        let bar = self.status_bar.as_mut().map(|b| b as &mut dyn StatusBar);
        self.indicator.refresh(bar, global);
    }
}
