use crate::{Note, NoteSnapshot};

/// The mutable front-end of user intent: the currently loaded note's title
/// and content plus a dirty flag. Exactly one instance is active per
/// [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    note_id: String,
    title: String,
    content: String,
    dirty: bool,
}

impl EditorState {
    /// Builds a clean buffer holding a copy of `note`.
    pub fn holding(note: &Note) -> Self {
        Self {
            note_id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            dirty: false,
        }
    }

    /// Replaces the buffer wholesale with `note` and clears the dirty flag.
    ///
    /// The session only calls this after the scheduler has confirmed the
    /// previous note's flush, so an unloaded edit can never be lost here.
    pub fn load(&mut self, note: &Note) {
        *self = Self::holding(note);
    }

    /// Applies a user edit to the buffer and marks it dirty.
    pub fn edit(&mut self, title: &str, content: &str) {
        self.title = title.to_string();
        self.content = content.to_string();
        self.dirty = true;
    }

    /// Snapshot of the buffer handed to the autosave scheduler.
    pub fn snapshot(&self) -> NoteSnapshot {
        NoteSnapshot {
            id: self.note_id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }

    /// Marks the buffer as in sync with the store.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
