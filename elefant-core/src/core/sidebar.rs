//! Ordered, read-only view over the store's note summaries.

use crate::{ElefantError, Result, SidebarEntry, Storage};

/// The sidebar: most-recently-modified-first entries plus the active
/// selection. Never writes to the store; it is recomputed from it after
/// every successful write and on startup.
#[derive(Debug, Default)]
pub struct SidebarIndex {
    entries: Vec<SidebarEntry>,
    active_id: Option<String>,
}

impl SidebarIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the entries from the store.
    ///
    /// A selection pointing at a note that no longer exists is cleared
    /// rather than left dangling.
    pub fn refresh(&mut self, storage: &Storage) -> Result<()> {
        self.entries = storage.list()?;
        if let Some(id) = &self.active_id {
            if !self.contains(id) {
                self.active_id = None;
            }
        }
        Ok(())
    }

    /// Marks `note_id` as the active note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::NoteNotFound`] if `note_id` is not
    /// among the current entries — selection of an unknown id is an error,
    /// never silently ignored.
    pub fn select(&mut self, note_id: &str) -> Result<()> {
        if !self.contains(note_id) {
            return Err(ElefantError::NoteNotFound(note_id.to_string()));
        }
        self.active_id = Some(note_id.to_string());
        Ok(())
    }

    pub fn contains(&self, note_id: &str) -> bool {
        self.entries.iter().any(|e| e.id == note_id)
    }

    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Note;

    fn storage_with(notes: &[(&str, &str, i64)]) -> Storage {
        let mut storage = Storage::open_in_memory().unwrap();
        for (id, title, modified) in notes {
            storage
                .put(&Note {
                    id: (*id).to_string(),
                    title: (*title).to_string(),
                    content: String::new(),
                    last_modified: *modified,
                })
                .unwrap();
        }
        storage
    }

    #[test]
    fn test_refresh_orders_most_recent_first() {
        let storage = storage_with(&[("a", "Old.md", 1), ("b", "New.md", 99_999_999_999_999)]);
        let mut sidebar = SidebarIndex::new();
        sidebar.refresh(&storage).unwrap();

        assert_eq!(sidebar.entries()[0].id, "b");
        assert!(sidebar.contains("a"));
    }

    #[test]
    fn test_select_unknown_id_is_an_error() {
        let storage = storage_with(&[("a", "A.md", 1)]);
        let mut sidebar = SidebarIndex::new();
        sidebar.refresh(&storage).unwrap();

        assert!(matches!(
            sidebar.select("ghost"),
            Err(ElefantError::NoteNotFound(_))
        ));
        assert_eq!(sidebar.active_id(), None);
    }

    #[test]
    fn test_refresh_clears_dangling_selection() {
        let mut storage = storage_with(&[("a", "A.md", 1)]);
        let mut sidebar = SidebarIndex::new();
        sidebar.refresh(&storage).unwrap();
        sidebar.select("a").unwrap();

        storage.remove("a").unwrap();
        sidebar.refresh(&storage).unwrap();

        assert_eq!(sidebar.active_id(), None);
    }
}
