use regex::Regex;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use anyhow::{Context, Result};

const REGEX_PATTERNS_RANGE: &str =
    r"^\s*(?P<sline>\d+):(?P<schar>\d+)\s*-\s*(?P<eline>\d+):(?P<echar>\d+)\s*$";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("selection must look like LINE:COL-LINE:COL, got '{0}'")]
    Format(String),
    #[error("selection lines and columns start at 1, got '{0}'")]
    ZeroBased(String),
}

/// Zero-based line/character pair, the way editors address text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Position { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Range {
                start: end,
                end: start,
            }
        } else {
            Range { start, end }
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }
}

/// Parses the 1-based `LINE:COL-LINE:COL` form used on the command line.
impl FromStr for Range {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let caps = Regex::new(REGEX_PATTERNS_RANGE)
            .map_err(|_| SelectionParseError::Format(s.to_string()))?
            .captures(s)
            .ok_or_else(|| SelectionParseError::Format(s.to_string()))?;

        let num = |name: &str| -> std::result::Result<usize, SelectionParseError> {
            let n = caps[name]
                .parse::<usize>()
                .map_err(|_| SelectionParseError::Format(s.to_string()))?;
            n.checked_sub(1)
                .ok_or_else(|| SelectionParseError::ZeroBased(s.to_string()))
        };

        Ok(Range::new(
            Position::new(num("sline")?, num("schar")?),
            Position::new(num("eline")?, num("echar")?),
        ))
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line + 1,
            self.start.character + 1,
            self.end.line + 1,
            self.end.character + 1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Document { text: text.into() }
    }

    pub fn open(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let text = std::fs::read_to_string(Path::new(&expanded))
            .with_context(|| format!("Failed to read document {expanded}"))?;
        Ok(Document::new(text))
    }

    /// Range covering the whole document.
    pub fn full_range(&self) -> Range {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let last = lines.len() - 1;
        Range::new(
            Position::default(),
            Position::new(last, lines[last].chars().count()),
        )
    }

    /// Text between two positions. Positions beyond a line or the document
    /// clamp to the nearest valid offset.
    pub fn text_in(&self, range: &Range) -> String {
        let start = self.offset_at(range.start());
        let end = self.offset_at(range.end());
        self.text[start..end].to_string()
    }

    fn offset_at(&self, pos: Position) -> usize {
        let mut offset = 0;
        for (n, line) in self.text.split('\n').enumerate() {
            if n == pos.line {
                return offset
                    + line
                        .char_indices()
                        .nth(pos.character)
                        .map(|(i, _)| i)
                        .unwrap_or(line.len());
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }
}

/// The active editor: a document plus its selections, primary first.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    selections: Vec<Range>,
}

impl Editor {
    pub fn new(document: Document, selections: Vec<Range>) -> Self {
        Editor {
            document,
            selections,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selections(&self) -> &[Range] {
        &self.selections
    }
}

pub fn selected_text(editor: Option<&Editor>) -> String {
    editor
        .and_then(|e| e.selections().first().map(|r| e.document().text_in(r)))
        .unwrap_or_default()
}
