/// A byte range `[start, end)` into the document.
///
/// Syntax nodes, visible ranges, candidate regions and decorations all speak
/// in spans, so every layer of the engine agrees on offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes; zero for an inverted span.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns true if the two spans share at least one offset, or touch.
    ///
    /// Touching counts: `[0, 4)` and `[4, 8)` intersect. Tree iteration
    /// restricted to a range visits nodes that merely touch its edges.
    #[must_use]
    pub fn touches(self, other: Span) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Clamps the span into `[0, max]`.
    #[must_use]
    pub fn clamp_to(self, max: usize) -> Span {
        Span {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
