//! Per-editor overtype flag and the side table that owns it.

use core_events::EditorId;
use core_state::SubscriptionId;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// The overtype flag of one editor. Shared between the table and that
/// editor's interceptor, so the interceptor reads the live value without
/// going back through the table.
#[derive(Debug, Default)]
pub struct ModeState {
    overtype: Cell<bool>,
}

impl ModeState {
    pub fn new(overtype: bool) -> Rc<Self> {
        Rc::new(Self {
            overtype: Cell::new(overtype),
        })
    }

    pub fn get(&self) -> bool {
        self.overtype.get()
    }

    /// Store `value`, returning the previous one.
    pub fn replace(&self, value: bool) -> bool {
        self.overtype.replace(value)
    }
}

#[derive(Debug)]
pub struct ModeRecord {
    pub state: Rc<ModeState>,
    /// Interceptor subscription held with the host.
    pub subscription: SubscriptionId,
}

/// Registered editors keyed by identity. Presence in the table is what
/// "this editor is already patched" means.
#[derive(Debug, Default)]
pub struct ModeTable {
    records: HashMap<EditorId, ModeRecord>,
}

impl ModeTable {
    pub fn contains(&self, id: EditorId) -> bool {
        self.records.contains_key(&id)
    }

    /// Insert a record unless one exists. Returns false (and drops `record`) on a second install.
    pub fn install(&mut self, id: EditorId, record: ModeRecord) -> bool {
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, record);
        true
    }

    pub fn remove(&mut self, id: EditorId) -> Option<ModeRecord> {
        self.records.remove(&id)
    }

    /// `false` for editors never seen.
    pub fn is_overtype(&self, id: EditorId) -> bool {
        self.records.get(&id).is_some_and(|r| r.state.get())
    }

    /// Returns the previous value, or `None` when `id` is not registered.
    pub fn set_overtype(&self, id: EditorId, value: bool) -> Option<bool> {
        self.records.get(&id).map(|r| r.state.replace(value))
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (EditorId, ModeRecord)> + '_ {
        self.records.drain()
    }
}
