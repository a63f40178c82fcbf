//! Presentation of the save-status state machine.

use crate::SaveStatus;

/// Maps a [`SaveStatus`] to the short-lived label the header displays.
///
/// `Idle` and `Dirty` render as empty: the UI stays quiet between an edit and
/// the debounce firing.
#[must_use]
pub fn status_label(status: SaveStatus) -> &'static str {
    match status {
        SaveStatus::Idle | SaveStatus::Dirty => "",
        SaveStatus::Saving => "Saving…",
        SaveStatus::Saved => "Saved",
        SaveStatus::Error => "Save failed",
    }
}

/// Tracks the transient "just-saved" marker alongside the status label.
///
/// The marker is set the instant `Saved` is entered and cleared after a fixed
/// display window or upon leaving `Saved`. It is purely presentational
/// emphasis (the front-end styles it as a highlight class) and carries no
/// persistence semantics.
#[derive(Debug)]
pub struct StatusIndicator {
    display_window_ms: i64,
    last: SaveStatus,
    saved_since: Option<i64>,
}

impl StatusIndicator {
    pub fn new(display_window_ms: i64) -> Self {
        Self {
            display_window_ms,
            last: SaveStatus::Idle,
            saved_since: None,
        }
    }

    /// Feeds the indicator the current scheduler status.
    pub fn observe(&mut self, status: SaveStatus, now_ms: i64) {
        match status {
            SaveStatus::Saved => {
                if self.last != SaveStatus::Saved {
                    self.saved_since = Some(now_ms);
                }
            }
            _ => self.saved_since = None,
        }
        self.last = status;
    }

    /// The label for the last observed status.
    #[must_use]
    pub fn label(&self) -> &'static str {
        status_label(self.last)
    }

    /// Whether the just-saved marker is currently lit.
    #[must_use]
    pub fn just_saved(&self, now_ms: i64) -> bool {
        self.saved_since
            .is_some_and(|since| now_ms - since < self.display_window_ms)
    }
}
