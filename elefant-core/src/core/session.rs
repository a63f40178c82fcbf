//! The session coordinator: one open notes database bound to one editor.
//!
//! `Session` owns every piece of application state — store, sidebar, editor
//! buffer, autosave scheduler, status indicator — and is the only place they
//! meet. UI bindings drive it through explicit commands (`edit`, `save`,
//! `create_note`, `select_note`, `delete_note`, `tick`) and read the derived
//! views back; no component reads ambient global state.
//!
//! The model is single-threaded and cooperative: each command runs to
//! completion, and the two suspension points of the autosave machine (the
//! debounce deadline and the store write) surface as explicit events, so
//! every interleaving is reproducible under a [`ManualClock`](crate::ManualClock).

use crate::{
    AutosaveScheduler, Clock, EditorState, ElefantError, Note, Result, SaveAction, SaveStatus,
    SidebarIndex, StatusIndicator, Storage, SystemClock,
};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

/// Title given to notes created with [`Session::create_note`].
pub const UNTITLED_TITLE: &str = "Untitled.md";

/// Timing knobs for the autosave machinery.
///
/// Both windows are configurable on purpose: the defaults (300 ms debounce,
/// 2 s "Saved" display) are the values the front-end was tuned against, not
/// a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long after the last edit the autosave write is issued.
    pub debounce: Duration,
    /// How long the "Saved" label and just-saved marker stay visible.
    pub saved_display: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            saved_display: Duration::from_secs(2),
        }
    }
}

/// A UI-agnostic command consumed by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The user changed the title and/or content of the active note.
    Edit { title: String, content: String },
    /// Explicit save (e.g. `Ctrl+S`).
    Save,
    /// The "new note" action.
    CreateNote,
    /// A sidebar entry was clicked.
    SelectNote(String),
    /// A note was deleted via the context menu.
    DeleteNote(String),
    /// Time passed; fire any elapsed deadline or display window.
    Tick,
}

/// An open editing session over a notes database.
pub struct Session {
    storage: Storage,
    sidebar: SidebarIndex,
    editor: EditorState,
    scheduler: AutosaveScheduler,
    indicator: StatusIndicator,
    clock: Rc<dyn Clock>,
    last_save_error: Option<String>,
}

impl Session {
    /// Opens the notes database at `path` with default timing and the system
    /// clock, and loads the active note into the editor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::Database`] if the database cannot be
    /// opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_clock(path, SessionConfig::default(), Rc::new(SystemClock))
    }

    /// Opens a session with explicit timing configuration and clock.
    ///
    /// The persisted active note is restored when it still exists; otherwise
    /// the most recently modified note becomes active. A store whose every
    /// record is unreadable is reseeded with the welcome note, so this never
    /// yields a session without an open note.
    pub fn with_clock<P: AsRef<Path>>(
        path: P,
        config: SessionConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        let mut storage = Storage::open(path)?;
        let mut sidebar = SidebarIndex::new();
        sidebar.refresh(&storage)?;

        if sidebar.is_empty() {
            log::warn!("no readable notes in store, reseeding welcome note");
            storage.seed_welcome()?;
            sidebar.refresh(&storage)?;
        }

        let active_id = match storage.active_note()? {
            Some(id) if sidebar.contains(&id) => id,
            _ => sidebar.entries()[0].id.clone(),
        };
        let note = storage.get(&active_id)?;
        let editor = EditorState::holding(&note);
        sidebar.select(&active_id)?;
        storage.set_active_note(Some(&active_id))?;

        let debounce_ms = config.debounce.as_millis() as i64;
        let display_ms = config.saved_display.as_millis() as i64;

        Ok(Self {
            storage,
            sidebar,
            editor,
            scheduler: AutosaveScheduler::new(debounce_ms, display_ms),
            indicator: StatusIndicator::new(display_ms),
            clock,
            last_save_error: None,
        })
    }

    // ── Commands ──────────────────────────────────────────────────

    /// Dispatches a [`Command`] to the matching method.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Edit { title, content } => {
                self.edit(&title, &content);
                Ok(())
            }
            Command::Save => self.save(),
            Command::CreateNote => self.create_note().map(|_| ()),
            Command::SelectNote(id) => self.select_note(&id),
            Command::DeleteNote(id) => self.delete_note(&id),
            Command::Tick => self.tick(),
        }
    }

    /// Applies a user edit to the editor buffer and (re)arms the debounce
    /// deadline. The write itself happens later, on [`tick`](Self::tick).
    pub fn edit(&mut self, title: &str, content: &str) {
        let now = self.clock.now_ms();
        self.editor.edit(title, content);
        self.scheduler.note_edited(self.editor.snapshot(), now);
        self.indicator.observe(self.scheduler.status(), now);
    }

    /// Fires any elapsed debounce deadline or "Saved" display window,
    /// performing the resulting write synchronously.
    ///
    /// A rejected write lands in `Error` status with the content retained —
    /// it is not propagated, and the next edit or explicit save retries it.
    pub fn tick(&mut self) -> Result<()> {
        let action = self.scheduler.tick(self.clock.now_ms());
        self.pump(action)
    }

    /// Explicit save command: writes dirty content immediately, bypassing
    /// the debounce deadline.
    pub fn save(&mut self) -> Result<()> {
        let action = self.scheduler.save_now(self.clock.now_ms());
        self.pump(action)
    }

    /// Makes `note_id` the active note and loads it into the editor.
    ///
    /// Any unsaved content of the previously active note is flushed and
    /// confirmed *before* the new note is loaded; if that flush fails the
    /// switch is aborted so no edit can be lost.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::NoteNotFound`] if `note_id` is not in
    /// the store, or [`crate::ElefantError::StoreWriteFailure`] if the flush
    /// write was rejected.
    pub fn select_note(&mut self, note_id: &str) -> Result<()> {
        if !self.sidebar.contains(note_id) {
            return Err(ElefantError::NoteNotFound(note_id.to_string()));
        }
        self.flush_active()?;

        let note = self.storage.get(note_id)?;
        self.editor.load(&note);
        self.sidebar.select(note_id)?;
        self.storage.set_active_note(Some(note_id))?;
        self.indicator
            .observe(self.scheduler.status(), self.clock.now_ms());
        Ok(())
    }

    /// Creates an empty `"Untitled.md"` note, inserts it as the most recent
    /// sidebar entry, and makes it the active note.
    ///
    /// The previously active note is flushed first, per the same rule as
    /// [`select_note`](Self::select_note).
    pub fn create_note(&mut self) -> Result<Note> {
        self.flush_active()?;

        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: UNTITLED_TITLE.to_string(),
            content: String::new(),
            last_modified: self.clock.now_ms(),
        };
        self.storage.put(&note)?;
        self.sidebar.refresh(&self.storage)?;
        self.sidebar.select(&note.id)?;
        self.storage.set_active_note(Some(&note.id))?;
        self.editor.load(&note);
        log::debug!("created note {}", note.id);
        Ok(note)
    }

    /// Deletes `note_id` from the store.
    ///
    /// Deleting the active note discards its scheduled save and activates
    /// the most recently modified remaining note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ElefantError::LastNote`] if `note_id` is the only
    /// note left, or [`crate::ElefantError::NoteNotFound`] if it does not
    /// exist.
    pub fn delete_note(&mut self, note_id: &str) -> Result<()> {
        if !self.sidebar.contains(note_id) {
            return Err(ElefantError::NoteNotFound(note_id.to_string()));
        }
        if self.sidebar.len() <= 1 {
            return Err(ElefantError::LastNote);
        }

        let was_active = self.editor.note_id() == note_id;
        if was_active {
            // A write scheduled for a deleted note is moot.
            self.scheduler.discard();
        }

        self.storage.remove(note_id)?;
        self.sidebar.refresh(&self.storage)?;

        if was_active {
            if let Some(next_id) = self.sidebar.entries().first().map(|e| e.id.clone()) {
                let note = self.storage.get(&next_id)?;
                self.editor.load(&note);
                self.sidebar.select(&next_id)?;
                self.storage.set_active_note(Some(&next_id))?;
            }
        }

        self.indicator
            .observe(self.scheduler.status(), self.clock.now_ms());
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────────

    pub fn status(&self) -> SaveStatus {
        self.scheduler.status()
    }

    /// The header label for the current status (`""`, `"Saving…"`,
    /// `"Saved"` or `"Save failed"`).
    pub fn status_label(&self) -> &'static str {
        self.indicator.label()
    }

    /// Whether the transient just-saved marker is lit.
    pub fn just_saved(&self) -> bool {
        self.indicator.just_saved(self.clock.now_ms())
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn sidebar(&self) -> &SidebarIndex {
        &self.sidebar
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Message of the most recent failed write, cleared by the next
    /// successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// The next instant [`tick`](Self::tick) has work to do, for embedders
    /// that arm a real timer instead of polling.
    pub fn next_wakeup(&self) -> Option<i64> {
        self.scheduler.next_wakeup()
    }

    // ── Internals ─────────────────────────────────────────────────

    /// Performs scheduler-issued writes until the machine settles.
    ///
    /// Writes are strictly serialized: each `BeginWrite` is completed and
    /// reported back before the scheduler can issue the next (the coalesced
    /// follow-up after an edit raced a write).
    fn pump(&mut self, mut action: SaveAction) -> Result<()> {
        while let SaveAction::BeginWrite(snapshot) = action {
            let note = Note {
                id: snapshot.id,
                title: snapshot.title,
                content: snapshot.content,
                last_modified: self.clock.now_ms(),
            };
            match self.storage.put(&note) {
                Ok(()) => {
                    log::debug!("autosaved note {}", note.id);
                    self.last_save_error = None;
                    action = self.scheduler.write_succeeded(self.clock.now_ms());
                    self.sidebar.refresh(&self.storage)?;
                }
                Err(e) => {
                    log::warn!("write for note {} rejected: {e}", note.id);
                    self.last_save_error = Some(e.to_string());
                    self.scheduler.write_failed(self.clock.now_ms());
                    action = SaveAction::None;
                }
            }
        }

        if self.scheduler.status() == SaveStatus::Saved {
            self.editor.mark_clean();
        }
        self.indicator
            .observe(self.scheduler.status(), self.clock.now_ms());
        Ok(())
    }

    /// Flushes any unsaved content of the active note and confirms it.
    fn flush_active(&mut self) -> Result<()> {
        let action = self.scheduler.flush(self.clock.now_ms());
        self.pump(action)?;

        if self.scheduler.status() == SaveStatus::Error {
            let msg = self
                .last_save_error
                .clone()
                .unwrap_or_else(|| "write failed".to_string());
            return Err(ElefantError::StoreWriteFailure(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use tempfile::NamedTempFile;

    const DEBOUNCE: i64 = 300;
    const DISPLAY: i64 = 2_000;

    /// The welcome note is seeded with the wall clock, so start the manual
    /// clock comfortably ahead of it to keep ordering deterministic.
    fn test_clock() -> Rc<ManualClock> {
        Rc::new(ManualClock::new(SystemClock.now_ms() + 60_000))
    }

    fn open_session(path: &std::path::Path) -> (Session, Rc<ManualClock>) {
        let clock = test_clock();
        let session = Session::with_clock(path, SessionConfig::default(), clock.clone()).unwrap();
        (session, clock)
    }

    #[test]
    fn test_first_open_loads_welcome_note() {
        let temp = NamedTempFile::new().unwrap();
        let (session, _clock) = open_session(temp.path());

        assert_eq!(session.sidebar().len(), 1);
        assert_eq!(session.editor().title(), "Welcome.md");
        assert!(session.editor().content().contains("# Welcome to Elefant"));
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_edit_burst_produces_single_debounced_write() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, clock) = open_session(temp.path());
        let id = session.editor().note_id().to_string();
        let original = session.storage().get(&id).unwrap();

        for i in 0..5 {
            session.edit("Welcome.md", &format!("draft {i}"));
            clock.advance(50);
            session.tick().unwrap();
        }
        // 250 ms after the first edit, 50 ms after the last: nothing has
        // been written yet.
        assert_eq!(session.status(), SaveStatus::Dirty);
        assert_eq!(session.storage().get(&id).unwrap(), original);

        clock.advance(DEBOUNCE);
        session.tick().unwrap();

        let written = session.storage().get(&id).unwrap();
        assert_eq!(written.content, "draft 4");
        assert_eq!(session.status(), SaveStatus::Saved);
        // Exactly one write: the stored timestamp is the firing tick's.
        assert_eq!(written.last_modified, clock.now_ms());
    }

    #[test]
    fn test_status_visits_saved_then_idle() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, clock) = open_session(temp.path());

        session.edit("Welcome.md", "hello");
        assert_eq!(session.status_label(), "");

        clock.advance(DEBOUNCE);
        session.tick().unwrap();
        assert_eq!(session.status(), SaveStatus::Saved);
        assert_eq!(session.status_label(), "Saved");
        assert!(session.just_saved());
        assert!(!session.editor().is_dirty());

        clock.advance(DISPLAY);
        session.tick().unwrap();
        assert_eq!(session.status(), SaveStatus::Idle);
        assert_eq!(session.status_label(), "");
        assert!(!session.just_saved());
    }

    #[test]
    fn test_manual_save_is_immediate() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let id = session.editor().note_id().to_string();

        session.edit("Welcome.md", "saved by hand");
        session.save().unwrap();

        assert_eq!(session.status(), SaveStatus::Saved);
        assert_eq!(
            session.storage().get(&id).unwrap().content,
            "saved by hand"
        );
    }

    #[test]
    fn test_create_note_adds_entry_first_and_activates_it() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let before = session.sidebar().len();

        let note = session.create_note().unwrap();

        assert_eq!(session.sidebar().len(), before + 1);
        assert_eq!(session.sidebar().entries()[0].id, note.id);
        assert!(note.title.contains("Untitled"));
        assert_eq!(session.sidebar().active_id(), Some(note.id.as_str()));
        assert_eq!(session.editor().note_id(), note.id);
        assert_eq!(session.editor().content(), "");
    }

    #[test]
    fn test_switch_flushes_dirty_note_before_loading() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let welcome_id = session.editor().note_id().to_string();

        let note = session.create_note().unwrap();
        session.edit("Untitled.md", "typed and not yet saved");

        // Switch back immediately, well inside the debounce window.
        session.select_note(&welcome_id).unwrap();

        assert_eq!(
            session.storage().get(&note.id).unwrap().content,
            "typed and not yet saved"
        );
        assert_eq!(session.editor().note_id(), welcome_id);
        assert!(session.editor().content().contains("# Welcome to Elefant"));
    }

    #[test]
    fn test_create_note_flushes_previous_note() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let welcome_id = session.editor().note_id().to_string();

        session.edit("Welcome.md", "edited welcome");
        session.create_note().unwrap();

        assert_eq!(
            session.storage().get(&welcome_id).unwrap().content,
            "edited welcome"
        );
    }

    #[test]
    fn test_select_unknown_note_is_an_error() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());

        assert!(matches!(
            session.select_note("ghost"),
            Err(ElefantError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_cannot_delete_last_note() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let id = session.editor().note_id().to_string();

        assert!(matches!(
            session.delete_note(&id),
            Err(ElefantError::LastNote)
        ));
        assert_eq!(session.sidebar().len(), 1);
    }

    #[test]
    fn test_delete_active_note_activates_next() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, _clock) = open_session(temp.path());
        let welcome_id = session.editor().note_id().to_string();

        let note = session.create_note().unwrap();
        session.edit("Untitled.md", "doomed edit");
        session.delete_note(&note.id).unwrap();

        assert_eq!(session.sidebar().len(), 1);
        assert_eq!(session.editor().note_id(), welcome_id);
        // The discarded note's scheduled save must not resurrect it.
        assert_eq!(session.status(), SaveStatus::Idle);
        assert!(matches!(
            session.storage().get(&note.id),
            Err(ElefantError::NoteNotFound(_))
        ));
    }

    #[test]
    fn test_active_note_survives_reopen() {
        let temp = NamedTempFile::new().unwrap();
        let note_id = {
            let (mut session, _clock) = open_session(temp.path());
            session.create_note().unwrap().id
        };

        let (session, _clock) = open_session(temp.path());
        assert_eq!(session.editor().note_id(), note_id);
        assert_eq!(session.sidebar().active_id(), Some(note_id.as_str()));
    }

    #[test]
    fn test_autosaved_content_survives_reopen() {
        let temp = NamedTempFile::new().unwrap();
        {
            let (mut session, clock) = open_session(temp.path());
            session.edit("Welcome.md", "durable");
            clock.advance(DEBOUNCE);
            session.tick().unwrap();
        }

        let (session, _clock) = open_session(temp.path());
        assert_eq!(session.editor().content(), "durable");
    }

    #[test]
    fn test_dispatch_maps_commands() {
        let temp = NamedTempFile::new().unwrap();
        let (mut session, clock) = open_session(temp.path());

        session
            .dispatch(Command::Edit {
                title: "Welcome.md".to_string(),
                content: "via dispatch".to_string(),
            })
            .unwrap();
        clock.advance(DEBOUNCE);
        session.dispatch(Command::Tick).unwrap();
        assert_eq!(session.status(), SaveStatus::Saved);

        session.dispatch(Command::CreateNote).unwrap();
        assert_eq!(session.sidebar().len(), 2);
    }

    #[test]
    fn test_all_records_corrupt_falls_back_to_welcome() {
        let temp = NamedTempFile::new().unwrap();
        {
            let (session, _clock) = open_session(temp.path());
            session
                .storage()
                .connection()
                .execute("UPDATE notes SET record = 'garbage'", [])
                .unwrap();
        }

        let (session, _clock) = open_session(temp.path());
        assert!(session.editor().content().contains("# Welcome to Elefant"));
    }
}
