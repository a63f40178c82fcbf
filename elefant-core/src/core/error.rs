//! Error types for the Elefant core library.

use thiserror::Error;

/// All errors that can occur within the Elefant core library.
#[derive(Debug, Error)]
pub enum ElefantError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A persistence write was rejected by the note store.
    ///
    /// The unsaved content is retained by the autosave scheduler; any further
    /// edit or an explicit save retries the write.
    #[error("Write rejected by the note store: {0}")]
    StoreWriteFailure(String),

    /// A note ID was requested that does not exist in the store.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A stored note record could not be deserialized.
    ///
    /// Never fatal: corrupt rows are skipped when listing, and an unreadable
    /// store falls back to the seeded welcome note.
    #[error("Corrupt note record: {0}")]
    CorruptRecord(String),

    /// An attempt was made to delete the last remaining note.
    #[error("Cannot delete the last remaining note")]
    LastNote,

    /// Note data could not be serialized to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`ElefantError`].
pub type Result<T> = std::result::Result<T, ElefantError>;

impl ElefantError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to access notes: {e}"),
            Self::StoreWriteFailure(_) => "Save failed — your changes are kept and will be retried".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::CorruptRecord(_) => "A note could not be read".to_string(),
            Self::LastNote => "You can't delete the last note".to_string(),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}
