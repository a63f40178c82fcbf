use serde::{Deserialize, Serialize};

/// A stored note record.
///
/// Owned exclusively by the [`Storage`](crate::Storage); the editor holds a
/// copy while editing. Fields serialize in camelCase (`lastModified`),
/// matching the shape the front-end exchanges with the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Last modification time in epoch milliseconds.
    pub last_modified: i64,
}

/// A read-only projection of a [`Note`] used for sidebar rendering.
///
/// Recomputed from the store on every refresh, never independently mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    pub id: String,
    pub title: String,
    pub last_modified: i64,
}

impl From<&Note> for SidebarEntry {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            last_modified: note.last_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note {
            id: "n1".to_string(),
            title: "Shopping".to_string(),
            content: "- milk".to_string(),
            last_modified: 1700000000000,
        };
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("lastModified"));
        assert!(!json.contains("last_modified"));
    }

    #[test]
    fn test_sidebar_entry_from_note() {
        let note = Note {
            id: "n1".to_string(),
            title: "Shopping".to_string(),
            content: "- milk".to_string(),
            last_modified: 42,
        };
        let entry = SidebarEntry::from(&note);
        assert_eq!(entry.id, "n1");
        assert_eq!(entry.title, "Shopping");
        assert_eq!(entry.last_modified, 42);
    }
}
