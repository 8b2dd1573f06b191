//! Editor host model: the traits a host implements for the overtype core, and
//! an in-memory host (`Workspace`) that implements them.
//!
//! Insert pipeline (per `EditorState::insert`):
//! 1. every subscribed `InsertHook` sees the pending `WillInsertText` together
//!    with the buffer and a mutable selection list;
//! 2. selections are normalized (sorted, overlaps merged);
//! 3. one undo snapshot is taken;
//! 4. each selection is replaced with the text, in descending order, and
//!    collapsed after the inserted text.
//!
//! Hooks therefore always run strictly before text application, and an
//! overwrite (selection extended by a hook, then replaced) undoes in a single
//! step.
//!
//! Closing an editor drops its hooks first and then runs its disposal list
//! once. Teardowns must not assume the editor still exists.

mod editor;
pub mod host;
pub mod selection;
pub mod undo;
mod workspace;

pub use editor::EditorState;
pub use host::{EditorHost, ElementClass, HostError, InsertHook, SubscriptionId, Teardown};
pub use selection::{Selection, SelectionError};
pub use undo::{UNDO_HISTORY_MAX, UndoEngine};
pub use workspace::Workspace;
