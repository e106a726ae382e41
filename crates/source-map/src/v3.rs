//! Source Map v3 documents.

use crate::LineCol;

const BASE64_DIGITS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A Source Map v3 document for a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SourceMapV3 {
    /// Always `3`.
    pub version: u8,
    /// Name of the generated file, if known.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub file: Option<String>,
    /// The single original source.
    pub sources: Vec<String>,
    /// Original text of each entry in `sources`.
    pub sources_content: Vec<String>,
    /// Symbol names. Rewrites never rename anything, so this stays empty.
    pub names: Vec<String>,
    /// Base64 VLQ encoded segments, `;` between generated lines.
    pub mappings: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    encoder: SegmentEncoder,
}

/// Running state for relative VLQ fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SegmentEncoder {
    generated_line: u32,
    line_has_segment: bool,
    generated_col: u32,
    original_line: u32,
    original_col: u32,
}

impl SourceMapV3 {
    /// Creates an empty map over one original source.
    pub fn new(source_name: &str, source_content: &str) -> Self {
        Self {
            version: 3,
            file: None,
            sources: vec![source_name.to_string()],
            sources_content: vec![source_content.to_string()],
            names: Vec::new(),
            mappings: String::new(),
            encoder: SegmentEncoder::default(),
        }
    }

    /// Sets the generated file name.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Appends a segment mapping `generated` to `original` in source 0.
    ///
    /// Segments must arrive in generated order.
    pub(crate) fn add_segment(&mut self, generated: LineCol, original: LineCol) {
        let state = &mut self.encoder;
        while state.generated_line < generated.line {
            self.mappings.push(';');
            state.generated_line += 1;
            state.generated_col = 0;
            state.line_has_segment = false;
        }
        if state.line_has_segment {
            self.mappings.push(',');
        }

        encode_vlq(
            &mut self.mappings,
            i64::from(generated.col) - i64::from(state.generated_col),
        );
        encode_vlq(&mut self.mappings, 0);
        encode_vlq(
            &mut self.mappings,
            i64::from(original.line) - i64::from(state.original_line),
        );
        encode_vlq(
            &mut self.mappings,
            i64::from(original.col) - i64::from(state.original_col),
        );

        state.line_has_segment = true;
        state.generated_col = generated.col;
        state.original_line = original.line;
        state.original_col = original.col;
    }

    /// Serializes the map as JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the map as an inline `data:` URL for a
    /// `//# sourceMappingURL=` comment.
    #[cfg(feature = "serde")]
    pub fn to_data_url(&self) -> serde_json::Result<String> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let json = self.to_json()?;
        Ok(format!(
            "data:application/json;charset=utf-8;base64,{}",
            STANDARD.encode(json)
        ))
    }
}

fn encode_vlq(out: &mut String, value: i64) {
    let mut rest = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = rest & 0b1_1111;
        rest >>= 5;
        if rest > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64_DIGITS[digit as usize] as char);
        if rest == 0 {
            break;
        }
    }
}
