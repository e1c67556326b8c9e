//! Source location leaves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A span of text: offset/length plus line and column bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub offset: usize,
    pub length: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceRange {
    pub fn new(offset: usize, length: usize, start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            offset,
            length,
            start_line: start.0,
            start_column: start.1,
            end_line: end.0,
            end_column: end.1,
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},<{},{}>,<{},{}>)",
            self.offset,
            self.length,
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column
        )
    }
}

/// A range inside a named source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub range: SourceRange,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, range: SourceRange) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|{}", self.path, self.range)
    }
}
