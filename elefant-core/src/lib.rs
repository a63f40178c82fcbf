//! Core library for Elefant — a minimalist, local-first Markdown note editor.
//!
//! The primary entry point is [`Session`], which represents an open notes
//! database bound to a single editor surface. All document mutations go
//! through `Session` commands; the debounced autosave machinery lives in
//! [`AutosaveScheduler`] and is fully deterministic under an injected
//! [`Clock`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    clock::{Clock, ManualClock, SystemClock},
    editor::EditorState,
    error::{ElefantError, Result},
    note::{Note, SidebarEntry},
    scheduler::{AutosaveScheduler, NoteSnapshot, SaveAction, SaveStatus},
    session::{Command, Session, SessionConfig},
    sidebar::SidebarIndex,
    status::{status_label, StatusIndicator},
    storage::Storage,
};
