//! Debounced autosave scheduling for the active note.
//!
//! [`AutosaveScheduler`] is a pure state machine: every method takes the
//! current time in epoch milliseconds and returns a [`SaveAction`] effect for
//! the caller to perform. The machine never touches the store itself, which
//! keeps every timing-dependent transition inspectable and deterministic.
//!
//! Invariants:
//! - At most one write is in flight for the note at any time. An edit that
//!   arrives mid-write sets a pending flag and is coalesced into exactly one
//!   follow-up write once the first completes.
//! - The debounce deadline is cancelled the moment a write is initiated.
//! - A failed write retains the unsaved snapshot; nothing is dropped.

/// The content handed to the store when a write is issued: a copy of the
/// editor buffer at scheduling time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSnapshot {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Save-status of the active note. Exactly one value holds at any instant;
/// scheduler transitions are the only way it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// No unsaved changes and no recent save to announce.
    Idle,
    /// Edited; a debounce deadline is armed.
    Dirty,
    /// A write is in flight.
    Saving,
    /// The last write succeeded; shown until the display window elapses.
    Saved,
    /// The last write failed; the unsaved snapshot is retained for retry.
    Error,
}

/// Effect returned by scheduler methods for the caller to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAction {
    /// Nothing to do right now.
    None,
    /// Write this snapshot to the store, then report back with
    /// [`AutosaveScheduler::write_succeeded`] or
    /// [`AutosaveScheduler::write_failed`].
    BeginWrite(NoteSnapshot),
}

/// Debounces editor edits into serialized store writes and owns the
/// save-status state machine.
pub struct AutosaveScheduler {
    status: SaveStatus,
    debounce_ms: i64,
    saved_display_ms: i64,
    /// Debounce deadline while `Dirty`.
    deadline: Option<i64>,
    /// End of the display window while `Saved`.
    saved_until: Option<i64>,
    /// Latest snapshot awaiting its debounce deadline (`Dirty`) or retained
    /// after a failed write (`Error`).
    queued: Option<NoteSnapshot>,
    /// Snapshot currently being written.
    in_flight: Option<NoteSnapshot>,
    /// Edit that arrived while a write was in flight; at most one, always
    /// the latest.
    pending: Option<NoteSnapshot>,
}

impl AutosaveScheduler {
    pub fn new(debounce_ms: i64, saved_display_ms: i64) -> Self {
        Self {
            status: SaveStatus::Idle,
            debounce_ms,
            saved_display_ms,
            deadline: None,
            saved_until: None,
            queued: None,
            in_flight: None,
            pending: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// The next instant at which [`tick`](Self::tick) has work to do, if any.
    /// Embedders can use this to arm a real timer instead of polling.
    pub fn next_wakeup(&self) -> Option<i64> {
        match (self.deadline, self.saved_until) {
            (Some(d), Some(s)) => Some(d.min(s)),
            (d, s) => d.or(s),
        }
    }

    /// Records a user edit.
    ///
    /// Restarts the debounce deadline in every state except `Saving`, where
    /// the snapshot is buffered instead: a second concurrent write for the
    /// same note must never start, so the machine marks that one more write
    /// is owed and keeps only the latest content.
    pub fn note_edited(&mut self, snapshot: NoteSnapshot, now_ms: i64) {
        match self.status {
            SaveStatus::Saving => {
                self.pending = Some(snapshot);
            }
            _ => {
                self.status = SaveStatus::Dirty;
                self.queued = Some(snapshot);
                self.deadline = Some(now_ms + self.debounce_ms);
                self.saved_until = None;
            }
        }
    }

    /// Drives time-based transitions: the debounce deadline firing and the
    /// "Saved" display window elapsing.
    pub fn tick(&mut self, now_ms: i64) -> SaveAction {
        match self.status {
            SaveStatus::Dirty if self.deadline.is_some_and(|d| now_ms >= d) => self.begin_write(),
            SaveStatus::Saved if self.saved_until.is_some_and(|s| now_ms >= s) => {
                self.status = SaveStatus::Idle;
                self.saved_until = None;
                SaveAction::None
            }
            _ => SaveAction::None,
        }
    }

    /// Explicit save command. Short-circuits the debounce deadline but obeys
    /// the same coalescing rules; from `Error` it retries the retained
    /// snapshot.
    pub fn save_now(&mut self, _now_ms: i64) -> SaveAction {
        match self.status {
            SaveStatus::Dirty | SaveStatus::Error if self.queued.is_some() => self.begin_write(),
            // Mid-write there is nothing new to schedule: any edit since the
            // write started is already buffered in `pending`.
            _ => SaveAction::None,
        }
    }

    /// Forces an immediate write of any unsaved snapshot, bypassing the
    /// debounce deadline. Called before the active note is switched.
    pub fn flush(&mut self, _now_ms: i64) -> SaveAction {
        match self.status {
            SaveStatus::Dirty | SaveStatus::Error if self.queued.is_some() => self.begin_write(),
            _ => SaveAction::None,
        }
    }

    /// Reports that the in-flight write committed.
    ///
    /// If an edit was buffered while the write ran, the machine stays in
    /// `Saving` and immediately re-issues a write with that snapshot;
    /// otherwise it settles into `Saved` and arms the display window.
    pub fn write_succeeded(&mut self, now_ms: i64) -> SaveAction {
        debug_assert_eq!(self.status, SaveStatus::Saving);
        self.in_flight = None;

        if let Some(buffered) = self.pending.take() {
            self.in_flight = Some(buffered.clone());
            return SaveAction::BeginWrite(buffered);
        }

        self.status = SaveStatus::Saved;
        self.saved_until = Some(now_ms + self.saved_display_ms);
        SaveAction::None
    }

    /// Reports that the in-flight write failed.
    ///
    /// The latest unsaved snapshot (the buffered edit if one arrived, else
    /// the content that failed to write) is retained so a later edit or an
    /// explicit save can retry it.
    pub fn write_failed(&mut self, _now_ms: i64) {
        debug_assert_eq!(self.status, SaveStatus::Saving);
        self.status = SaveStatus::Error;
        self.queued = self.pending.take().or(self.in_flight.take());
        self.deadline = None;
        self.saved_until = None;
    }

    /// Drops all scheduled and retained work and resets to `Idle`.
    ///
    /// Used when the note the scheduler was tracking is deleted.
    pub fn discard(&mut self) {
        *self = Self::new(self.debounce_ms, self.saved_display_ms);
    }

    /// True when no unsaved snapshot exists anywhere in the machine.
    pub fn is_settled(&self) -> bool {
        self.queued.is_none() && self.in_flight.is_none() && self.pending.is_none()
    }

    fn begin_write(&mut self) -> SaveAction {
        // The deadline dies with the write: coalescing, not the timer,
        // guards content edited from here on.
        self.deadline = None;
        self.saved_until = None;
        match self.queued.take() {
            Some(snapshot) => {
                self.status = SaveStatus::Saving;
                self.in_flight = Some(snapshot.clone());
                SaveAction::BeginWrite(snapshot)
            }
            None => SaveAction::None,
        }
    }
}
