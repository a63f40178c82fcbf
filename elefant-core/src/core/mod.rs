//! Internal domain modules for the Elefant core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod clock;
pub mod editor;
pub mod error;
pub mod note;
pub mod scheduler;
pub mod session;
pub mod sidebar;
pub mod status;
pub mod storage;

#[doc(inline)]
pub use clock::{Clock, ManualClock, SystemClock};
#[doc(inline)]
pub use editor::EditorState;
#[doc(inline)]
pub use error::{ElefantError, Result};
#[doc(inline)]
pub use note::{Note, SidebarEntry};
#[doc(inline)]
pub use scheduler::{AutosaveScheduler, NoteSnapshot, SaveAction, SaveStatus};
#[doc(inline)]
pub use session::{Command, Session, SessionConfig};
#[doc(inline)]
pub use sidebar::SidebarIndex;
#[doc(inline)]
pub use status::{status_label, StatusIndicator};
#[doc(inline)]
pub use storage::Storage;
