//! Line-oriented command scripts.
//!
//! One command per line; blank lines and `#` comments are skipped. Edits may
//! be prefixed with `@<ms>` to pin their timestamp:
//!
//! ```text
//! @0    insert 0 hello
//! @6000 insert 5 \sworld
//! undo
//! find -i WORLD
//! next
//! print
//! ```

use anyhow::{Context, Result, anyhow, bail};
use caretpad_core::SearchOptions;
use caretpad_session::SessionCmd;
use std::time::Duration;

/// A parsed script line.
#[derive(Debug, Clone)]
pub enum Step {
    Cmd(SessionCmd),
    /// Print the current text.
    Print,
}

/// A step together with the line it came from (1-based).
#[derive(Debug, Clone)]
pub struct Line {
    pub number: usize,
    pub step: Step,
}

/// Parse a whole script. Fails on the first malformed line.
pub fn parse(source: &str) -> Result<Vec<Line>> {
    let mut out = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let number = i + 1;
        let line = raw.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("line {number}"))?;
        out.push(Line { number, step });
    }
    Ok(out)
}

fn parse_line(line: &str) -> Result<Step> {
    let (at, line) = match line.strip_prefix('@') {
        Some(rest) => {
            let (ms, rest) = split_word(rest);
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("bad timestamp `@{ms}`"))?;
            (Some(Duration::from_millis(ms)), rest.trim_start())
        }
        None => (None, line),
    };
    let (verb, rest) = split_word(line);
    let step = match verb {
        "insert" => {
            let (idx, text) = split_word(rest);
            Step::Cmd(SessionCmd::Insert {
                idx: parse_index(idx)?,
                text: unescape(text)?,
                at,
            })
        }
        "delete" => {
            let (start, rest) = split_word(rest);
            let (end, extra) = split_word(rest);
            no_trailing(extra)?;
            Step::Cmd(SessionCmd::Delete {
                range: parse_index(start)?..parse_index(end)?,
                at,
            })
        }
        "find" => {
            let (query, options) = parse_find(rest)?;
            Step::Cmd(SessionCmd::Find { query, options })
        }
        "undo" | "redo" | "next" | "prev" | "print" => {
            no_trailing(rest)?;
            match verb {
                "undo" => Step::Cmd(SessionCmd::Undo),
                "redo" => Step::Cmd(SessionCmd::Redo),
                "next" => Step::Cmd(SessionCmd::NextMatch),
                "prev" => Step::Cmd(SessionCmd::PrevMatch),
                _ => Step::Print,
            }
        }
        other => bail!("unknown command `{other}`"),
    };
    let is_edit = matches!(
        step,
        Step::Cmd(SessionCmd::Insert { .. } | SessionCmd::Delete { .. })
    );
    if at.is_some() && !is_edit {
        bail!("timestamps only apply to insert and delete");
    }
    Ok(step)
}

fn parse_find(mut rest: &str) -> Result<(String, SearchOptions)> {
    let mut options = SearchOptions::default();
    loop {
        let (word, tail) = split_word(rest);
        match word {
            "-i" => options.case_sensitive = false,
            "-r" => options.regex = true,
            _ => break,
        }
        rest = tail;
    }
    let query = unescape(rest.trim_start())?;
    if query.is_empty() {
        bail!("find needs a query");
    }
    Ok((query, options))
}

// Splits off the first space-separated word, skipping any spaces before it.
// The remainder keeps everything after the single separating space, so insert
// text can start with spaces.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (s.trim_end(), ""),
    }
}

fn parse_index(s: &str) -> Result<usize> {
    s.parse()
        .with_context(|| format!("expected a character index, got `{s}`"))
}

fn no_trailing(rest: &str) -> Result<()> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(anyhow!("unexpected arguments `{}`", rest.trim()))
    }
}

/// Expand `\n`, `\t`, `\s` (space) and `\\`.
fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(other) => bail!("unknown escape `\\{other}`"),
            None => bail!("dangling `\\` at end of line"),
        }
    }
    Ok(out)
}
