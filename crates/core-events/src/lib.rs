//! Core event types for the overtype runtime.
//!
//! Everything here is plain data. The host raises these events on its UI thread
//! and the session dispatches them one at a time; nothing is queued across
//! threads and nothing here blocks.

use std::fmt;

/// Command name for toggling overtype in the active editor.
pub const TOGGLE_COMMAND: &str = "overtype-mode:toggle";
/// Command name for toggling overtype in every open editor.
pub const TOGGLE_ALL_COMMAND: &str = "overtype-mode:toggle-all";

/// Opaque identity of one open editor. Allocated by the host, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(pub u64);

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

/// Where a pending insertion came from.
///
/// Only text the user typed directly takes part in overwrite semantics; bulk and
/// synthetic insertions always insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertOrigin {
    /// A printable key press.
    Keystroke,
    /// Text committed by an IME composition.
    Composition,
    /// Clipboard or bracketed paste.
    Paste,
    /// Completion accepted from a popup.
    Autocomplete,
    /// Snippet expansion.
    Snippet,
    /// Any other API driven insertion.
    Programmatic,
}

impl InsertOrigin {
    /// True for origins that represent direct typed character entry.
    pub fn is_typed(self) -> bool {
        matches!(self, InsertOrigin::Keystroke | InsertOrigin::Composition)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InsertOrigin::Keystroke => "keystroke",
            InsertOrigin::Composition => "composition",
            InsertOrigin::Paste => "paste",
            InsertOrigin::Autocomplete => "autocomplete",
            InsertOrigin::Snippet => "snippet",
            InsertOrigin::Programmatic => "programmatic",
        }
    }
}

/// Payload of the "text is about to be inserted" hook.
///
/// Log `text.len()` only; typed content never goes to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WillInsertText {
    pub editor: EditorId,
    pub text: String,
    pub origin: InsertOrigin,
}

impl WillInsertText {
    pub fn new(editor: EditorId, text: impl Into<String>, origin: InsertOrigin) -> Self {
        Self {
            editor,
            text: text.into(),
            origin,
        }
    }
}

/// Named commands exposed to the host. Both take no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandEvent {
    /// Toggle overtype for the active editor.
    ToggleActive,
    /// Toggle the global flag and apply it to every open editor.
    ToggleAll,
}

impl CommandEvent {
    pub fn name(self) -> &'static str {
        match self {
            CommandEvent::ToggleActive => TOGGLE_COMMAND,
            CommandEvent::ToggleAll => TOGGLE_ALL_COMMAND,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            TOGGLE_COMMAND => Some(CommandEvent::ToggleActive),
            TOGGLE_ALL_COMMAND => Some(CommandEvent::ToggleAll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Availability of the optional status bar service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEvent {
    Provided,
    Withdrawn,
}

/// A setting that changed in the live configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    ShowIndicator(bool),
}

/// Top-level event enum consumed by the session dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The host created (or first reported) an editor.
    EditorOpened(EditorId),
    /// The host is closing an editor; its disposal list runs.
    EditorClosed(EditorId),
    /// Focus moved to another editor.
    EditorFocused(EditorId),
    Command(CommandEvent),
    /// Text entry aimed at the active editor.
    Input { text: String, origin: InsertOrigin },
    ConfigChanged(SettingChange),
    StatusBar(ServiceEvent),
    /// Click on the status indicator tile.
    IndicatorClick(MouseButton),
    /// (Re-)activation of the whole package: bind every open editor.
    Activate,
    /// Unsubscribe every interceptor and clear styling.
    Deactivate,
    Shutdown,
}

impl Event {
    /// Short stable name for logging (never includes text payloads).
    pub fn kind(&self) -> &'static str {
        match self {
            Event::EditorOpened(_) => "editor_opened",
            Event::EditorClosed(_) => "editor_closed",
            Event::EditorFocused(_) => "editor_focused",
            Event::Command(_) => "command",
            Event::Input { .. } => "input",
            Event::ConfigChanged(_) => "config_changed",
            Event::StatusBar(_) => "status_bar",
            Event::IndicatorClick(_) => "indicator_click",
            Event::Activate => "activate",
            Event::Deactivate => "deactivate",
            Event::Shutdown => "shutdown",
        }
    }
}

/// Optional hooks that can observe events at the dispatch boundary.
///
/// Hooks must not block and must not dispatch further events synchronously.
pub trait EventHooks: 'static {
    fn pre_handle(&self, _event: &Event) {}
    fn post_handle(&self, _event: &Event) {}
}

/// Default no-op hooks implementation.
pub struct NoopEventHooks;

impl EventHooks for NoopEventHooks {}

/// Hooks that trace every dispatched event under the `runtime.events` target.
pub struct TracingEventHooks;

impl EventHooks for TracingEventHooks {
    fn pre_handle(&self, event: &Event) {
        match event {
            Event::Input { text, origin } => tracing::trace!(
                target: "runtime.events",
                kind = event.kind(),
                origin = origin.as_str(),
                size_bytes = text.len(),
                "dispatch"
            ),
            _ => tracing::trace!(target: "runtime.events", kind = event.kind(), "dispatch"),
        }
    }
}
