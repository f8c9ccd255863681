//! Source location spans.

use std::fmt;
use std::ops::Range;

/// Byte range in the filter source text.
///
/// Layout: 8 bytes, `start` inclusive, `end` exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for nodes synthesised by the parser (desugarings).
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Build from a byte range, saturating offsets past `u32::MAX`.
    ///
    /// Filters are short programs; a source that large is rejected by the
    /// lexer long before spans stop being meaningful.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        let clamp = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Span {
            start: clamp(range.start),
            end: clamp(range.end),
        }
    }

    /// Shift by `offset` bytes; used when re-lexing an interpolation segment.
    #[inline]
    #[must_use]
    pub fn offset_by(self, offset: u32) -> Span {
        Span {
            start: self.start.saturating_add(offset),
            end: self.end.saturating_add(offset),
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// 1-based line number of `start` within `source`.
    pub fn line_in(self, source: &str) -> u32 {
        let upto = (self.start as usize).min(source.len());
        let newlines = source.as_bytes()[..upto]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        u32::try_from(newlines).map_or(u32::MAX, |n| n.saturating_add(1))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let a = Span::new(4, 9);
        let b = Span::new(1, 6);
        assert_eq!(a.merge(b), Span::new(1, 9));
        assert_eq!(a.merge(b).len(), 8);
    }

    #[test]
    fn offset_shifts_both_ends() {
        assert_eq!(Span::new(2, 5).offset_by(10), Span::new(12, 15));
    }

    #[test]
    fn line_numbers_are_one_based() {
        let src = "def f:\n  .a;\n f";
        assert_eq!(Span::new(0, 3).line_in(src), 1);
        assert_eq!(Span::new(9, 11).line_in(src), 2);
        assert_eq!(Span::new(14, 15).line_in(src), 3);
    }

    #[test]
    fn from_range_round_trips() {
        let span = Span::from_range(3..7);
        assert_eq!(span.to_range(), 3..7);
        assert!(!span.is_empty());
        assert!(Span::DUMMY.is_empty());
    }
}
