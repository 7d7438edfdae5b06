use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Error, Result, Source};
use crate::stack::{BoundedStack, Push};
use crate::surface::TextSurface;

/// Default number of snapshots each stack can hold.
pub const DEFAULT_CAPACITY: usize = 20;
/// Default minimum spacing between two snapshots.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(5000);

/// Immutable capture of the full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    content: String,
}

impl Snapshot {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Tuning for [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub debounce: Duration,
    /// Clear the undo stack and fail with
    /// [`Error::CapacityInconsistency`] when undo finds it full.
    pub reset_full_undo: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            debounce: DEFAULT_DEBOUNCE,
            reset_full_undo: false,
        }
    }
}

/// What [`History::on_edit`] did with an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A snapshot was pushed onto the undo stack.
    Recorded,
    /// A snapshot was due but the undo stack was full.
    Dropped,
    /// The edit falls inside the current debounce window.
    Coalesced,
}

/// Result of a successful undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStep {
    /// Snapshot now shown on the surface.
    pub restored: Snapshot,
    /// Whether the replaced text made it onto the opposite stack.
    pub displaced: Push,
}

/// Snapshot-based undo/redo history with time-debounced capture.
#[derive(Debug, Clone)]
pub struct History {
    undo: BoundedStack<Snapshot>,
    redo: BoundedStack<Snapshot>,
    last_snapshot_at: Option<Duration>,
    config: HistoryConfig,
}

impl History {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: BoundedStack::new(config.capacity),
            redo: BoundedStack::new(config.capacity),
            last_snapshot_at: None,
            config,
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    /// Record an edit that left the surface holding `text` at time `now`.
    ///
    /// The first edit is always captured. Later edits are captured only once
    /// the debounce window since the previous capture has elapsed; anything
    /// in between folds into that previous undo step.
    pub fn on_edit(&mut self, text: &str, now: Duration) -> EditOutcome {
        if let Some(last) = self.last_snapshot_at {
            if now.saturating_sub(last) < self.config.debounce {
                debug!(?now, "edit coalesced");
                return EditOutcome::Coalesced;
            }
        }
        self.last_snapshot_at = Some(now);
        self.redo.clear();
        match self.undo.push(Snapshot::new(text)) {
            Push::Pushed => {
                info!(?now, depth = self.undo.len(), "snapshot recorded");
                EditOutcome::Recorded
            }
            Push::Full => {
                warn!(capacity = self.undo.capacity(), "undo history full, snapshot dropped");
                EditOutcome::Dropped
            }
        }
    }

    /// Restore the most recent snapshot onto `surface`.
    pub fn undo<S: TextSurface>(&mut self, surface: &mut S) -> Result<UndoStep> {
        if self.undo.is_empty() {
            return Err(Error::Empty(Source::Undo));
        }
        if self.config.reset_full_undo && self.undo.is_full() {
            warn!("undo history found full, resetting");
            self.undo.clear();
            return Err(Error::CapacityInconsistency);
        }
        let restored = self.undo.pop().ok_or(Error::Empty(Source::Undo))?;
        let displaced = self.redo.push(Snapshot::new(surface.text()));
        if displaced.is_full() {
            warn!("redo history full, current text not kept");
        }
        apply(surface, &restored);
        info!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        Ok(UndoStep {
            restored,
            displaced,
        })
    }

    /// Reapply the most recently undone snapshot onto `surface`.
    pub fn redo<S: TextSurface>(&mut self, surface: &mut S) -> Result<UndoStep> {
        let restored = self.redo.pop().ok_or(Error::Empty(Source::Redo))?;
        let displaced = self.undo.push(Snapshot::new(surface.text()));
        if displaced.is_full() {
            warn!("undo history full, current text not kept");
        }
        apply(surface, &restored);
        info!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        Ok(UndoStep {
            restored,
            displaced,
        })
    }

    /// Forget all snapshots and restart the debounce clock.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.last_snapshot_at = None;
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn last_snapshot_at(&self) -> Option<Duration> {
        self.last_snapshot_at
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

fn apply<S: TextSurface>(surface: &mut S, snapshot: &Snapshot) {
    surface.set_text(snapshot.content());
    surface.set_caret(surface.len_chars());
    surface.clear_highlights();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RopeSurface;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_edit_always_snapshots() {
        let mut history = History::default();
        assert_eq!(history.on_edit("a", ms(0)), EditOutcome::Recorded);
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.last_snapshot_at(), Some(ms(0)));
    }

    #[test]
    fn spaced_edits_each_snapshot() {
        let mut history = History::default();
        for i in 0..6 {
            assert_eq!(history.on_edit("x", ms(i * 5000)), EditOutcome::Recorded);
        }
        assert_eq!(history.undo_depth(), 6);
    }

    #[test]
    fn debounce_scenario() {
        let mut history = History::default();
        let outcomes: Vec<EditOutcome> = [0, 1000, 2000, 6000, 7000]
            .iter()
            .map(|t| history.on_edit("x", ms(*t)))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                EditOutcome::Recorded,
                EditOutcome::Coalesced,
                EditOutcome::Coalesced,
                EditOutcome::Recorded,
                EditOutcome::Coalesced,
            ]
        );
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.last_snapshot_at(), Some(ms(6000)));
    }

    #[test]
    fn rapid_edits_collapse_per_window() {
        let mut history = History::default();
        // one edit every 500ms for 12s: windows open at 0, 5000, 10000
        for i in 0..24 {
            let _ = history.on_edit("x", ms(i * 500));
        }
        assert_eq!(history.undo_depth(), 3);
    }

    #[test]
    fn undo_then_redo_restores_text() {
        let mut surface = RopeSurface::from_text("");
        let mut history = History::default();
        surface.insert(0, "one");
        history.on_edit(&surface.text(), ms(0));
        surface.insert(3, " two");
        history.on_edit(&surface.text(), ms(6000));
        surface.insert(7, " three");

        let before = surface.text();
        let step = history.undo(&mut surface).unwrap();
        assert_eq!(step.restored.content(), "one two");
        assert_eq!(step.displaced, Push::Pushed);
        assert_eq!(surface.text(), "one two");
        assert_eq!(surface.caret(), surface.len_chars());

        history.redo(&mut surface).unwrap();
        assert_eq!(surface.text(), before);
        assert_eq!(surface.caret(), surface.len_chars());
    }

    #[test]
    fn undo_clears_highlights() {
        let mut surface = RopeSurface::from_text("abc");
        let mut history = History::default();
        history.on_edit("ab", ms(0));
        surface.highlight(0..1);
        history.undo(&mut surface).unwrap();
        assert!(surface.highlights().is_empty());
    }

    #[test]
    fn new_snapshot_clears_redo() {
        let mut surface = RopeSurface::from_text("v2");
        let mut history = History::default();
        history.on_edit("v1", ms(0));
        history.undo(&mut surface).unwrap();
        assert!(history.can_redo());

        // still inside the window: redo survives
        assert_eq!(history.on_edit("v1!", ms(1000)), EditOutcome::Coalesced);
        assert!(history.can_redo());

        assert_eq!(history.on_edit("v1!!", ms(5000)), EditOutcome::Recorded);
        assert!(!history.can_redo());
        assert_eq!(
            history.redo(&mut surface),
            Err(Error::Empty(Source::Redo))
        );
    }

    #[test]
    fn empty_history_reports_empty() {
        let mut surface = RopeSurface::from_text("text");
        let mut history = History::default();
        assert_eq!(history.undo(&mut surface), Err(Error::Empty(Source::Undo)));
        assert_eq!(history.redo(&mut surface), Err(Error::Empty(Source::Redo)));
        assert_eq!(surface.text(), "text");
    }

    #[test]
    fn full_undo_stack_drops_snapshot() {
        let mut history = History::new(HistoryConfig {
            capacity: 2,
            ..HistoryConfig::default()
        });
        assert_eq!(history.on_edit("a", ms(0)), EditOutcome::Recorded);
        assert_eq!(history.on_edit("b", ms(5000)), EditOutcome::Recorded);
        assert_eq!(history.on_edit("c", ms(10000)), EditOutcome::Dropped);
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.last_snapshot_at(), Some(ms(10000)));
    }

    #[test]
    fn full_undo_stack_still_undoes_by_default() {
        let mut surface = RopeSurface::from_text("c");
        let mut history = History::new(HistoryConfig {
            capacity: 2,
            ..HistoryConfig::default()
        });
        history.on_edit("a", ms(0));
        history.on_edit("b", ms(5000));
        let step = history.undo(&mut surface).unwrap();
        assert_eq!(step.restored.content(), "b");
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn reset_full_undo_clears_stack() {
        let mut surface = RopeSurface::from_text("c");
        let mut history = History::new(HistoryConfig {
            capacity: 2,
            reset_full_undo: true,
            ..HistoryConfig::default()
        });
        history.on_edit("a", ms(0));
        history.on_edit("b", ms(5000));
        assert_eq!(
            history.undo(&mut surface),
            Err(Error::CapacityInconsistency)
        );
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(surface.text(), "c");
    }

    #[test]
    fn clear_restarts_debounce() {
        let mut history = History::default();
        history.on_edit("a", ms(0));
        history.clear();
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.on_edit("b", ms(10)), EditOutcome::Recorded);
    }
}
