//! Byte-level chunk maps and their construction.

use crate::v3::SourceMapV3;
use crate::{ByteOffset, LineIndex, Span};
use text_size::TextSize;

/// A copied chunk: a generated range and the original range it came from.
///
/// Both spans always have the same length; inserted text has no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// The span in the generated output.
    pub generated: Span,
    /// The span in the original source.
    pub original: Span,
}

/// Copied chunks of a rewrite, in generated order.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of copied chunks.
    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Finds the original position corresponding to a generated position.
    ///
    /// Returns `None` for positions inside inserted text.
    pub fn original_position(&self, generated: ByteOffset) -> Option<ByteOffset> {
        let idx = match self
            .mappings
            .binary_search_by(|m| m.generated.start.cmp(&generated))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let mapping = self
            .mappings
            .get(idx)
            .filter(|m| m.generated.contains(generated))?;

        Some(mapping.original.start + (generated - mapping.generated.start))
    }

    /// Finds the generated position corresponding to an original position.
    pub fn generated_position(&self, original: ByteOffset) -> Option<ByteOffset> {
        // Copied chunks keep their relative order, so original starts are
        // sorted as well.
        let idx = match self
            .mappings
            .binary_search_by(|m| m.original.start.cmp(&original))
        {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let mapping = self
            .mappings
            .get(idx)
            .filter(|m| m.original.contains(original))?;

        Some(mapping.generated.start + (original - mapping.original.start))
    }

    /// Encodes this map as a Source Map v3 document.
    ///
    /// `generated` and `original` must be the texts the map was built for.
    /// Every copied chunk gets a segment at its start and at the start of each
    /// further generated line it spans.
    pub fn to_v3(&self, generated: &str, original: &str, source_name: &str) -> SourceMapV3 {
        let generated_lines = LineIndex::new(generated);
        let original_lines = LineIndex::new(original);
        let mut v3 = SourceMapV3::new(source_name, original);

        for mapping in &self.mappings {
            let starts = std::iter::once(mapping.generated.start)
                .chain(generated_lines.line_starts_within(mapping.generated));
            for generated_offset in starts {
                let original_offset =
                    mapping.original.start + (generated_offset - mapping.generated.start);
                let (Some(gen), Some(orig)) = (
                    generated_lines.line_col_utf16(generated_offset, generated),
                    original_lines.line_col_utf16(original_offset, original),
                ) else {
                    continue;
                };
                v3.add_segment(gen, orig);
            }
        }

        v3
    }
}

/// Records chunks while the caller emits the generated text in order.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<Mapping>,
    generated_offset: ByteOffset,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the generated text emitted so far.
    #[inline]
    pub fn generated_offset(&self) -> ByteOffset {
        self.generated_offset
    }

    /// Records `text`, copied verbatim from `original_start`, as the next
    /// generated chunk.
    pub fn add_source(&mut self, original_start: ByteOffset, text: &str) {
        if text.is_empty() {
            return;
        }
        let generated = Span::at(self.generated_offset, text.len());
        self.mappings.push(Mapping {
            generated,
            original: Span::at(original_start, text.len()),
        });
        self.generated_offset = generated.end;
    }

    /// Records inserted text that has no original position.
    pub fn add_generated(&mut self, text: &str) {
        self.generated_offset += TextSize::from(text.len() as u32);
    }

    pub fn build(self) -> SourceMap {
        SourceMap {
            mappings: self.mappings,
        }
    }
}
