//! Byte ranges.

use text_size::TextSize;

/// Offset of a byte in UTF-8 text.
pub type ByteOffset = TextSize;

/// Byte range `start..end`; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: ByteOffset,
    pub end: ByteOffset,
}

impl Span {
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The `len` bytes starting at `start`.
    #[inline]
    pub fn at(start: impl Into<ByteOffset>, len: usize) -> Self {
        let start = start.into();
        Self::new(start, start + TextSize::from(len as u32))
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the range. The end is never inside.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// The range as `usize` bounds, for slicing the text it was taken from.
    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        usize::from(self.start)..usize::from(self.end)
    }
}
