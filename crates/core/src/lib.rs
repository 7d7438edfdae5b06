//! Editing core for caretpad: snapshot undo/redo, the caret ring visited by
//! find, and the text surface they drive.

pub mod error;
pub mod history;
pub mod ring;
pub mod search;
pub mod stack;
pub mod surface;

pub use error::{Error, Result, Source};
pub use history::{EditOutcome, History, HistoryConfig, Snapshot, UndoStep};
pub use ring::CaretRing;
pub use search::{SearchOptions, find_all, match_ends};
pub use stack::{BoundedStack, Push};
pub use surface::{RopeSurface, TextSurface};
