use std::fmt;

/// Result alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which container came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Undo,
    Redo,
    Ring,
}

/// Errors reported by the editing core. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The undo stack, redo stack or caret ring had nothing to return.
    Empty(Source),
    /// The undo stack was found full during undo and has been reset.
    CapacityInconsistency,
    /// An offset lies beyond the end of the text.
    InvalidOffset { offset: usize, len: usize },
    /// A range is reversed or reaches past the end of the text.
    InvalidRange { start: usize, end: usize, len: usize },
    /// A search pattern failed to compile.
    InvalidPattern(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty(Source::Undo) => write!(f, "nothing to undo"),
            Error::Empty(Source::Redo) => write!(f, "nothing to redo"),
            Error::Empty(Source::Ring) => write!(f, "no matches to visit"),
            Error::CapacityInconsistency => {
                write!(f, "undo history was full and has been reset")
            }
            Error::InvalidOffset { offset, len } => {
                write!(f, "offset {offset} is past the end of the text ({len})")
            }
            Error::InvalidRange { start, end, len } => {
                write!(f, "invalid range {start}..{end} for text of length {len}")
            }
            Error::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}
