//! Source locations carried by every node and token.

use serde::Serialize;

/// A line/column position in the source text.
///
/// Lines are 1-based, columns are 0-based and counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, in characters.
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const START: Self = Self { line: 1, column: 0 };

    /// Create a position from a line and a column.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// A byte range in the source plus the matching line/column positions.
///
/// `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Position of `start`.
    pub start_pos: Position,
    /// Position of `end`.
    pub end_pos: Position,
}

impl Span {
    /// Create a span from offsets and positions.
    #[must_use]
    pub const fn new(start: usize, end: usize, start_pos: Position, end_pos: Position) -> Self {
        Self {
            start,
            end,
            start_pos,
            end_pos,
        }
    }

    /// A zero-width span at `offset`/`pos`.
    #[must_use]
    pub const fn empty_at(offset: usize, pos: Position) -> Self {
        Self::new(offset, offset, pos, pos)
    }

    /// Move this span's end to the end of `other`, keeping the start.
    pub const fn extend_to(&mut self, other: &Self) {
        self.end = other.end;
        self.end_pos = other.end_pos;
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub const fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}
