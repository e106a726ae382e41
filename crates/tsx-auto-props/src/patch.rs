//! Applying insertions to the original text.

use crate::resolve::PropertyNameSet;
use source_map::{SourceMap, SourceMapBuilder};

/// Text to insert at a byte offset of the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub offset: usize,
    pub text: String,
}

impl Insertion {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
        }
    }
}

/// The patched text and where its bytes came from.
#[derive(Debug)]
pub struct Patched {
    pub code: String,
    pub source_map: SourceMap,
}

/// Builds the statement that attaches `props` to a component.
///
/// `terminated` tells whether the preceding declaration ends with `;`; when it
/// does not, one is added so the statement can never merge with it.
pub fn define_props_statement(name: &str, props: &PropertyNameSet, terminated: bool) -> String {
    format!(
        "{}\nObject.defineProperty({}, \"props\", {{\n  value: {},\n}});",
        if terminated { "" } else { ";" },
        name,
        props.to_json_array()
    )
}

/// Inserts every snippet at its offset in one pass over `source`.
///
/// Insertions are ordered by offset; several at the same offset keep their
/// relative order. Offsets past the end of `source` or inside a UTF-8
/// sequence are ignored. Every original byte is copied exactly once and gets
/// a 1:1 mapping; inserted text is unmapped.
pub fn apply_insertions(source: &str, mut insertions: Vec<Insertion>) -> Patched {
    insertions.sort_by_key(|insertion| insertion.offset);

    let mut code = String::with_capacity(
        source.len() + insertions.iter().map(|i| i.text.len()).sum::<usize>(),
    );
    let mut builder = SourceMapBuilder::new();
    let mut last = 0;

    for insertion in insertions {
        if insertion.offset > source.len() || !source.is_char_boundary(insertion.offset) {
            tracing::debug!(offset = insertion.offset, "dropping insertion outside the source");
            continue;
        }
        let chunk = &source[last..insertion.offset];
        builder.add_source((last as u32).into(), chunk);
        code.push_str(chunk);

        builder.add_generated(&insertion.text);
        code.push_str(&insertion.text);
        last = insertion.offset;
    }

    let rest = &source[last..];
    builder.add_source((last as u32).into(), rest);
    code.push_str(rest);

    Patched {
        code,
        source_map: builder.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smol_str::SmolStr;
    use source_map::ByteOffset;

    fn props(names: &[&str]) -> PropertyNameSet {
        names.iter().copied().map(SmolStr::new).collect()
    }

    #[test]
    fn test_statement_shape() {
        assert_eq!(
            define_props_statement("Foo", &props(&["foo", "bar"]), true),
            "\nObject.defineProperty(Foo, \"props\", {\n  value: [\"foo\",\"bar\"],\n});"
        );
        assert!(define_props_statement("Foo", &props(&["foo"]), false).starts_with(";\nObject"));
    }

    #[test]
    fn test_inserts_in_offset_order() {
        let source = "aaa;bbb;";
        let patched = apply_insertions(
            source,
            vec![
                Insertion::new(8, "<2>"),
                Insertion::new(4, "<1a>"),
                Insertion::new(4, "<1b>"),
            ],
        );
        assert_eq!(patched.code, "aaa;<1a><1b>bbb;<2>");
    }

    #[test]
    fn test_preserves_original_bytes_and_maps_them() {
        let source = "héllo;\nworld;";
        let patched = apply_insertions(source, vec![Insertion::new(8, "X")]);
        assert_eq!(patched.code, "héllo;\nXworld;");

        let map = &patched.source_map;
        assert_eq!(map.len(), 2);
        // `w` moved by one byte.
        assert_eq!(
            map.original_position(ByteOffset::from(9)),
            Some(ByteOffset::from(8))
        );
        // The inserted `X` has no original position.
        assert_eq!(map.original_position(ByteOffset::from(8)), None);
        assert_eq!(
            map.generated_position(ByteOffset::from(0)),
            Some(ByteOffset::from(0))
        );
    }

    #[test]
    fn test_ignores_invalid_offsets() {
        let source = "é;";
        let patched = apply_insertions(
            source,
            vec![Insertion::new(1, "bad"), Insertion::new(99, "bad")],
        );
        assert_eq!(patched.code, source);
        assert_eq!(patched.source_map.len(), 1);
    }

    #[test]
    fn test_no_insertions_is_a_copy() {
        let patched = apply_insertions("let a = 1;", Vec::new());
        assert_eq!(patched.code, "let a = 1;");
        assert_eq!(patched.source_map.len(), 1);
    }
}
