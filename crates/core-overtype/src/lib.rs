//! Overtype (insert/overwrite) mode for an editor host.
//!
//! `OvertypeContext` is the single explicitly-owned state object: the global
//! flag, the side table of per-editor `ModeState` records, and the observers.
//! Components receive it explicitly; there are no ambient globals.
//!
//! * `binder` patches an editor once: mode record, interceptor subscription,
//!   styling, and a teardown tied to the editor's disposal list.
//! * `toggle` flips or forces modes for one editor or for all of them, always
//!   updating the mode and the `OVERTYPE_CURSOR` class together.
//! * `interceptor` rewrites selections right before a typed insertion.
//!
//! All mutation goes through `&mut OvertypeContext`, so a toggle cannot be
//! re-entered synchronously while it is iterating editors.

mod binder;
pub mod interceptor;
pub mod mode;
mod toggle;

use core_events::EditorId;
use std::cell::RefCell;
use std::rc::Rc;

pub use interceptor::{InsertionInterceptor, InterceptOutcome, extend_collapsed};
pub use mode::{ModeRecord, ModeState, ModeTable};

/// Receives mode changes after they have been applied to state and styling.
pub trait ModeObserver {
    fn editor_mode_changed(&self, _editor: EditorId, _overtype: bool) {}
    fn global_mode_changed(&self, _overtype: bool) {}
}

#[derive(Default)]
pub struct OvertypeContext {
    global: bool,
    modes: Rc<RefCell<ModeTable>>,
    observers: Vec<Box<dyn ModeObserver>>,
}

impl OvertypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current global flag; new editors start in this mode.
    pub fn global(&self) -> bool {
        self.global
    }

    /// `false` for editors that were never bound.
    pub fn is_overtype(&self, id: EditorId) -> bool {
        self.modes.borrow().is_overtype(id)
    }

    pub fn is_bound(&self, id: EditorId) -> bool {
        self.modes.borrow().contains(id)
    }

    pub fn bound_count(&self) -> usize {
        self.modes.borrow().count()
    }

    pub fn add_observer(&mut self, observer: Box<dyn ModeObserver>) {
        self.observers.push(observer);
    }

    fn notify_editor(&self, id: EditorId, value: bool) {
        for obs in &self.observers {
            obs.editor_mode_changed(id, value);
        }
    }

    fn notify_global(&self, value: bool) {
        for obs in &self.observers {
            obs.global_mode_changed(value);
        }
    }
}
