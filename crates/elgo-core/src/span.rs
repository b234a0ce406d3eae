//! Positions in the Go source, as handed over by the front-end.

use std::fmt;

/// Where a source node starts, and how many bytes it covers.
///
/// Line 0 marks a node the front-end synthesized (or an error raised after
/// lowering, where IR forms no longer carry positions).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// 1-based line.
    pub line: u32,
    /// 1-based byte column.
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// True for positions that do not point into a source file.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Smallest span on the same line covering both `self` and `other`.
    ///
    /// Spans on different lines keep the earlier start and its length.
    pub fn cover(self, other: Span) -> Span {
        let (first, second) = if (other.line, other.col) < (self.line, self.col) {
            (other, self)
        } else {
            (self, other)
        };
        if first.line != second.line {
            return first;
        }
        let end = (second.col + second.len).max(first.col + first.len);
        Span::new(first.line, first.col, end - first.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            f.write_str("<generated>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}
