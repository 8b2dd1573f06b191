//! The surface an editor host exposes to the overtype core.
//!
//! The core never reaches into host objects. It enumerates editors, subscribes
//! an `InsertHook` per editor, toggles a style class on the editor's visual
//! element and registers a teardown with the editor's disposal list. Any host
//! (the in-memory `Workspace` here, or a real editor) implements `EditorHost`.

use core_events::{EditorId, WillInsertText};
use core_text::Buffer;
use thiserror::Error;

use crate::Selection;

bitflags::bitflags! {
    /// Style classes on an editor's visual element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ElementClass: u8 {
        /// Block cursor shown while overtype is on.
        const OVERTYPE_CURSOR = 0b0000_0001;
        /// Editor has focus.
        const FOCUSED         = 0b0000_0010;
    }
}

/// Handle returned by `EditorHost::on_will_insert_text`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback run once when the editor it was registered with is destroyed.
/// The editor is already gone when it runs.
pub type Teardown = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{0} is not open")]
    UnknownEditor(EditorId),
}

/// Subscriber invoked before the host applies an insertion.
///
/// The hook may rewrite `selections`; the host applies the insertion against
/// whatever selections remain once every hook has returned. Hooks must not
/// panic and must not re-enter the host.
pub trait InsertHook {
    fn will_insert(&self, event: &WillInsertText, buffer: &Buffer, selections: &mut Vec<Selection>);
}

pub trait EditorHost {
    /// Every open editor, in a stable order.
    fn open_editors(&self) -> Vec<EditorId>;
    /// The editor that receives commands and typed text, if any.
    fn active_editor(&self) -> Option<EditorId>;
    fn is_open(&self, id: EditorId) -> bool;
    fn has_element_class(&self, id: EditorId, class: ElementClass) -> bool;
    fn set_element_class(
        &mut self,
        id: EditorId,
        class: ElementClass,
        enabled: bool,
    ) -> Result<(), HostError>;
    fn on_will_insert_text(
        &mut self,
        id: EditorId,
        hook: Box<dyn InsertHook>,
    ) -> Result<SubscriptionId, HostError>;
    /// Remove a subscription. Returns false when the editor or subscription is gone.
    fn dispose_subscription(&mut self, id: EditorId, subscription: SubscriptionId) -> bool;
    fn on_did_destroy(&mut self, id: EditorId, teardown: Teardown) -> Result<(), HostError>;
}

impl<T: EditorHost + ?Sized> EditorHost for &mut T {
    fn open_editors(&self) -> Vec<EditorId> {
        (**self).open_editors()
    }
    fn active_editor(&self) -> Option<EditorId> {
        (**self).active_editor()
    }
    fn is_open(&self, id: EditorId) -> bool {
        (**self).is_open(id)
    }
    fn has_element_class(&self, id: EditorId, class: ElementClass) -> bool {
        (**self).has_element_class(id, class)
    }
    fn set_element_class(
        &mut self,
        id: EditorId,
        class: ElementClass,
        enabled: bool,
    ) -> Result<(), HostError> {
        (**self).set_element_class(id, class, enabled)
    }
    fn on_will_insert_text(
        &mut self,
        id: EditorId,
        hook: Box<dyn InsertHook>,
    ) -> Result<SubscriptionId, HostError> {
        (**self).on_will_insert_text(id, hook)
    }
    fn dispose_subscription(&mut self, id: EditorId, subscription: SubscriptionId) -> bool {
        (**self).dispose_subscription(id, subscription)
    }
    fn on_did_destroy(&mut self, id: EditorId, teardown: Teardown) -> Result<(), HostError> {
        (**self).on_did_destroy(id, teardown)
    }
}
