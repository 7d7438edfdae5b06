use std::ops::Range;
use std::time::Duration;

use caretpad_core::{HistoryConfig, RopeSurface, SearchOptions};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::editor::{Editor, Frame};

/// Commands that can be sent to the session actor.
///
/// Edits carry an optional timestamp measured from the start of the
/// session; without one the session stamps them itself.
#[derive(Debug, Clone)]
pub enum SessionCmd {
    /// Insert `text` at character index `idx`.
    Insert {
        idx: usize,
        text: String,
        at: Option<Duration>,
    },
    /// Delete the characters in `range`.
    Delete {
        range: Range<usize>,
        at: Option<Duration>,
    },
    Undo,
    Redo,
    /// Highlight all matches of `query` and reset match navigation.
    Find {
        query: String,
        options: SearchOptions,
    },
    NextMatch,
    PrevMatch,
    /// Request the current frame without modifying state.
    RequestFrame,
}

/// Handle for interacting with a running session.
pub struct SessionHandle {
    pub cmd: mpsc::Sender<SessionCmd>,
    pub frames: mpsc::Receiver<Frame>,
}

impl SessionHandle {
    /// Send `cmd` and wait for the frame it produces. Returns `None` once the
    /// session has stopped.
    pub async fn request(&mut self, cmd: SessionCmd) -> Option<Frame> {
        self.cmd.send(cmd).await.ok()?;
        self.frames.recv().await
    }
}

struct Session {
    editor: Editor<RopeSurface>,
    started: Instant,
}

impl Session {
    /// Spawn a session actor editing `surface`.
    pub fn spawn(surface: RopeSurface, config: HistoryConfig) -> SessionHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (frame_tx, frame_rx) = mpsc::channel(8);
        let session = Session {
            editor: Editor::new(surface, config),
            started: Instant::now(),
        };
        tokio::spawn(async move {
            session.run(cmd_rx, frame_tx).await;
        });
        SessionHandle {
            cmd: cmd_tx,
            frames: frame_rx,
        }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionCmd>, tx: mpsc::Sender<Frame>) {
        while let Some(cmd) = rx.recv().await {
            let status = self.handle(cmd);
            if tx.send(self.editor.frame(status)).await.is_err() {
                break;
            }
        }
        debug!("session stopped");
    }

    // Applies one command, returning the user-facing error message if any.
    fn handle(&mut self, cmd: SessionCmd) -> Option<String> {
        let result = match cmd {
            SessionCmd::Insert { idx, text, at } => {
                let now = self.stamp(at);
                self.editor.insert(idx, &text, now).map(drop)
            }
            SessionCmd::Delete { range, at } => {
                let now = self.stamp(at);
                self.editor.delete(range, now).map(drop)
            }
            SessionCmd::Undo => self.editor.undo().map(drop),
            SessionCmd::Redo => self.editor.redo().map(drop),
            SessionCmd::Find { query, options } => self.editor.find(&query, options).map(drop),
            SessionCmd::NextMatch => self.editor.next_match().map(drop),
            SessionCmd::PrevMatch => self.editor.prev_match().map(drop),
            SessionCmd::RequestFrame => Ok(()),
        };
        result.err().map(|e| e.to_string())
    }

    fn stamp(&self, at: Option<Duration>) -> Duration {
        at.unwrap_or_else(|| self.started.elapsed())
    }
}

/// Open a session over `text` with the given history settings.
pub fn open(text: &str, config: HistoryConfig) -> SessionHandle {
    Session::spawn(RopeSurface::from_text(text), config)
}
