use ropey::Rope;
use std::ops::Range;

/// Live editable text the core reads from and commands.
///
/// Offsets are character indices.
pub trait TextSurface {
    /// Returns the entire text as a [`String`].
    fn text(&self) -> String;
    /// Replace the whole text. Does not count as a user edit.
    fn set_text(&mut self, text: &str);
    /// Number of characters in the text.
    fn len_chars(&self) -> usize;
    fn caret(&self) -> usize;
    /// Place the caret, clamped to the end of the text.
    fn set_caret(&mut self, offset: usize);
    /// Insert `text` at `char_idx`.
    fn insert(&mut self, char_idx: usize, text: &str);
    /// Delete the characters in `range`.
    fn delete(&mut self, range: Range<usize>);
    fn clear_highlights(&mut self);
    fn highlight(&mut self, range: Range<usize>);
    fn highlights(&self) -> &[Range<usize>];
}

/// Rope-backed [`TextSurface`].
#[derive(Debug, Clone, Default)]
pub struct RopeSurface {
    rope: Rope,
    caret: usize,
    highlights: Vec<Range<usize>>,
}

impl RopeSurface {
    /// Create a new `RopeSurface` from the provided text with the caret at
    /// the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: 0,
            highlights: Vec::new(),
        }
    }
}

impl TextSurface for RopeSurface {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.caret = self.caret.min(self.rope.len_chars());
        self.highlights.clear();
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.rope.len_chars());
    }

    fn insert(&mut self, char_idx: usize, text: &str) {
        self.rope.insert(char_idx, text);
        if self.caret >= char_idx {
            self.caret += text.chars().count();
        }
    }

    fn delete(&mut self, range: Range<usize>) {
        let Range { start, end } = range;
        self.rope.remove(start..end);
        if self.caret >= end {
            self.caret -= end - start;
        } else if self.caret > start {
            self.caret = start;
        }
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn highlight(&mut self, range: Range<usize>) {
        self.highlights.push(range);
    }

    fn highlights(&self) -> &[Range<usize>] {
        &self.highlights
    }
}
