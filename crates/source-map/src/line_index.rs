//! Line index for offset ↔ line/column conversion.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column. Byte-based from [`LineIndex::line_col`], UTF-16 code
    /// units from [`LineIndex::line_col_utf16`].
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Start offsets of every line in a text, for O(log n) position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );
        Self { line_starts }
    }

    /// Returns the number of lines in the text.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of(&self, offset: ByteOffset) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Converts a byte offset to a line and byte column.
    pub fn line_col(&self, offset: ByteOffset) -> LineCol {
        let line = self.line_of(offset);
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol::new(line as u32, col)
    }

    /// Converts a byte offset to a line and a column counted in UTF-16 code
    /// units, which is what Source Map v3 consumers expect.
    ///
    /// Returns `None` if the offset is past the end of `text` or not on a char
    /// boundary.
    pub fn line_col_utf16(&self, offset: ByteOffset, text: &str) -> Option<LineCol> {
        let line = self.line_of(offset);
        let start = u32::from(self.line_starts[line]) as usize;
        let prefix = text.get(start..u32::from(offset) as usize)?;
        Some(LineCol::new(line as u32, prefix.encode_utf16().count() as u32))
    }

    /// Returns the byte offset where a line starts.
    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.line_starts.get(line as usize).copied()
    }

    /// Returns the starts of lines that begin strictly inside `span`.
    pub fn line_starts_within(&self, span: Span) -> impl Iterator<Item = ByteOffset> + '_ {
        let first = self.line_starts.partition_point(|&start| start <= span.start);
        self.line_starts[first..]
            .iter()
            .copied()
            .take_while(move |&start| start < span.end)
    }
}
