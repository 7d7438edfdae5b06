use std::ops::Range;
use std::time::Duration;

use caretpad_core::{
    CaretRing, EditOutcome, Error, History, HistoryConfig, Result, SearchOptions, TextSurface,
    UndoStep, find_all, match_ends,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Serializable view of the editor after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub text: String,
    pub caret: usize,
    pub highlights: Vec<Range<usize>>,
    /// Number of caret positions in the match ring.
    pub matches: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    /// User-facing message from the last command, if it failed.
    pub status: Option<String>,
}

/// Wires user edits, undo/redo and find navigation to a [`TextSurface`].
///
/// All user edits go through [`insert`](Self::insert) and
/// [`delete`](Self::delete), which forward the new text to the history.
/// Undo and redo replace the surface text directly and are not themselves
/// recorded as edits.
pub struct Editor<S> {
    surface: S,
    history: History,
    ring: CaretRing,
}

impl<S: TextSurface> Editor<S> {
    pub fn new(surface: S, config: HistoryConfig) -> Self {
        Self {
            surface,
            history: History::new(config),
            ring: CaretRing::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn ring(&self) -> &CaretRing {
        &self.ring
    }

    /// Insert `text` at `char_idx` as a user edit made at `now`.
    ///
    /// Inserting nothing leaves the text as it was and is not reported to
    /// the history.
    pub fn insert(&mut self, char_idx: usize, text: &str, now: Duration) -> Result<EditOutcome> {
        let len = self.surface.len_chars();
        if char_idx > len {
            return Err(Error::InvalidOffset {
                offset: char_idx,
                len,
            });
        }
        if text.is_empty() {
            return Ok(EditOutcome::Coalesced);
        }
        self.surface.insert(char_idx, text);
        Ok(self.content_changed(now))
    }

    /// Delete the characters in `range` as a user edit made at `now`.
    pub fn delete(&mut self, range: Range<usize>, now: Duration) -> Result<EditOutcome> {
        let len = self.surface.len_chars();
        if range.start > range.end || range.end > len {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if range.is_empty() {
            return Ok(EditOutcome::Coalesced);
        }
        self.surface.delete(range);
        Ok(self.content_changed(now))
    }

    pub fn undo(&mut self) -> Result<UndoStep> {
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> Result<UndoStep> {
        self.history.redo(&mut self.surface)
    }

    /// Highlight every match of `query` and rebuild the caret ring from the
    /// match ends. Returns the number of matches.
    pub fn find(&mut self, query: &str, options: SearchOptions) -> Result<usize> {
        let text = self.surface.text();
        let matches = find_all(&text, query, options)?;
        self.ring
            .rebuild_within(&match_ends(&matches), self.surface.len_chars())?;
        self.surface.clear_highlights();
        for m in &matches {
            self.surface.highlight(m.clone());
        }
        info!(query, matches = matches.len(), "find");
        Ok(matches.len())
    }

    /// Move the caret to the next recorded match.
    pub fn next_match(&mut self) -> Result<usize> {
        let offset = self.ring.move_next()?;
        self.surface.set_caret(offset);
        debug!(offset, "next match");
        Ok(offset)
    }

    /// Move the caret to the previous recorded match.
    pub fn prev_match(&mut self) -> Result<usize> {
        let offset = self.ring.move_prev()?;
        self.surface.set_caret(offset);
        debug!(offset, "previous match");
        Ok(offset)
    }

    /// Current state, tagged with `status`.
    pub fn frame(&self, status: Option<String>) -> Frame {
        Frame {
            text: self.surface.text(),
            caret: self.surface.caret(),
            highlights: self.surface.highlights().to_vec(),
            matches: self.ring.len(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
            status,
        }
    }

    fn content_changed(&mut self, now: Duration) -> EditOutcome {
        let text = self.surface.text();
        self.history.on_edit(&text, now)
    }
}
