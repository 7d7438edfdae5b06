//! Find-all text search

use regex::{Regex, RegexBuilder};
use std::ops::Range;

use crate::error::Result;

/// How a query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            regex: false,
        }
    }
}

/// Every non-overlapping match of `query` in `text`, left to right, as
/// character ranges. An empty query matches nothing.
pub fn find_all(text: &str, query: &str, options: SearchOptions) -> Result<Vec<Range<usize>>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    if options.case_sensitive && !options.regex {
        return Ok(find_literal(text, query));
    }
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()?;
    Ok(find_regex(text, &re))
}

/// Caret offsets for a set of matches: the caret lands just past each one.
pub fn match_ends(matches: &[Range<usize>]) -> Vec<usize> {
    matches.iter().map(|m| m.end).collect()
}

fn find_literal(text: &str, needle: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(needle) {
        let start_b = offset + pos;
        let end_b = start_b + needle.len();
        out.push(byte_to_char_index(text, start_b)..byte_to_char_index(text, end_b));
        offset = end_b;
    }
    out
}

fn find_regex(text: &str, re: &Regex) -> Vec<Range<usize>> {
    re.find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| byte_to_char_index(text, m.start())..byte_to_char_index(text, m.end()))
        .collect()
}

fn byte_to_char_index(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx].chars().count()
}
