//! Durable note storage backed by a SQLite database file.
//!
//! Notes are stored one row per id as a JSON record plus a denormalized
//! `last_modified` column used for most-recently-modified-first listing.
//! The store is the single source of truth; the sidebar and editor are
//! derived views reconciled against it after every completed write.

use crate::{ElefantError, Note, Result, SidebarEntry};
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;

/// Title of the note seeded into an empty store.
pub const WELCOME_TITLE: &str = "Welcome.md";

/// Content of the seeded welcome note. The first heading is load-bearing:
/// the front-end asserts it on first launch.
pub const WELCOME_CONTENT: &str = "\
# Welcome to Elefant

A minimalist, distraction-free Markdown editor.

## Features
- **Autosave** — your notes are saved as you type
- **Sidebar** — most recent notes first, one click away
- **Keyboard Shortcuts** — `Ctrl+S` save, `Ctrl+N` new note
";

/// An open note store.
///
/// `put` is atomic per note id: a write fully replaces the prior record for
/// that id or fails without partial mutation (single SQLite statement).
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the note database at `path`.
    ///
    /// On first run — no stored notes — the store seeds one welcome note so
    /// the application never starts empty. This is the only implicit side
    /// effect the store performs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::Database`] if the file cannot be opened
    /// as a SQLite database or the schema cannot be applied.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let mut storage = Self { conn };
        let count: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        if count == 0 {
            storage.seed_welcome()?;
        }

        Ok(storage)
    }

    /// Opens an in-memory store. Useful for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        let mut storage = Self { conn };
        storage.seed_welcome()?;
        Ok(storage)
    }

    /// Inserts a fresh welcome note and returns it.
    ///
    /// Also called by the session when every stored record turns out to be
    /// unreadable, so the application always has at least one openable note.
    pub fn seed_welcome(&mut self) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: WELCOME_TITLE.to_string(),
            content: WELCOME_CONTENT.to_string(),
            last_modified: chrono::Utc::now().timestamp_millis(),
        };
        self.put(&note)?;
        log::debug!("seeded welcome note {}", note.id);
        Ok(note)
    }

    /// Writes `note`, fully replacing any prior record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::Database`] if the write is rejected, or
    /// [`crate::ElefantError::Json`] if the note cannot be serialized.
    pub fn put(&mut self, note: &Note) -> Result<()> {
        let record = serde_json::to_string(note)?;
        self.conn.execute(
            "INSERT INTO notes (id, record, last_modified) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 record = excluded.record,
                 last_modified = excluded.last_modified",
            rusqlite::params![note.id, record, note.last_modified],
        )?;
        Ok(())
    }

    /// Fetches one note by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::NoteNotFound`] if no row exists for
    /// `note_id`, or [`crate::ElefantError::CorruptRecord`] if the stored
    /// record fails to parse.
    pub fn get(&self, note_id: &str) -> Result<Note> {
        let record: String = self
            .conn
            .query_row(
                "SELECT record FROM notes WHERE id = ?1",
                [note_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    ElefantError::NoteNotFound(note_id.to_string())
                }
                other => ElefantError::Database(other),
            })?;

        serde_json::from_str(&record)
            .map_err(|e| ElefantError::CorruptRecord(format!("note {note_id}: {e}")))
    }

    /// Lists sidebar entries for every readable note, most recently modified
    /// first.
    ///
    /// Rows whose record fails to parse are skipped with a warning rather
    /// than failing the whole listing.
    pub fn list(&self) -> Result<Vec<SidebarEntry>> {
        let mut stmt = self
            .conn
            // rowid breaks last_modified ties in favour of the newest row,
            // so a note created in the same millisecond as a write still
            // lists first.
            .prepare("SELECT id, record FROM notes ORDER BY last_modified DESC, rowid DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, record) = row?;
            match serde_json::from_str::<Note>(&record) {
                Ok(note) => entries.push(SidebarEntry::from(&note)),
                Err(e) => log::warn!("skipping corrupt note record {id}: {e}"),
            }
        }
        Ok(entries)
    }

    /// Deletes the note with `note_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::NoteNotFound`] if no such row exists —
    /// SQLite reports a DELETE touching zero rows as success, so the row
    /// count is checked explicitly.
    pub fn remove(&mut self, note_id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", [note_id])?;
        if changed == 0 {
            return Err(ElefantError::NoteNotFound(note_id.to_string()));
        }
        Ok(())
    }

    // ── Session metadata ──────────────────────────────────────────

    /// Persists (or clears) the active note id so it survives a restart.
    pub fn set_active_note(&mut self, note_id: Option<&str>) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM session_meta WHERE key = 'active_note_id'", [])?;
        if let Some(id) = note_id {
            tx.execute(
                "INSERT INTO session_meta (key, value) VALUES ('active_note_id', ?1)",
                [id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Returns the persisted active note id, or `None` if no value is stored.
    pub fn active_note(&self) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM session_meta WHERE key = 'active_note_id'",
            [],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Raw access to the underlying connection, for tests and migrations.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
