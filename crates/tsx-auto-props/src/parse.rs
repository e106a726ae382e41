//! TSX parsing on top of `swc_ecma_parser`.

use crate::error::SyntaxError;
use source_map::Span;
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span as SwcSpan, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{error::Error as SwcError, Parser, StringInput, Syntax, TsSyntax};

const BOM: char = '\u{feff}';

/// A parsed module together with the base position of its source file.
///
/// swc positions are global to the `SourceMap` that loaded the file and do
/// not count a leading byte-order mark; this type converts them back into
/// byte offsets into the original text.
pub struct ParsedFile {
    /// The syntax tree.
    pub module: Module,
    origin: FileOrigin,
}

/// Where swc's positions for one file start in the original text.
#[derive(Debug, Clone, Copy)]
struct FileOrigin {
    file_start: BytePos,
    bom_len: u32,
}

impl FileOrigin {
    fn new(file_start: BytePos, source: &str) -> Self {
        let bom_len = if source.starts_with(BOM) {
            BOM.len_utf8() as u32
        } else {
            0
        };
        Self { file_start, bom_len }
    }

    fn offset(self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.file_start.0) + self.bom_len
    }
}

impl ParsedFile {
    /// Converts an swc position into a byte offset into the source text.
    pub fn offset(&self, pos: BytePos) -> usize {
        self.origin.offset(pos) as usize
    }

    /// Converts an swc span into a source span.
    pub fn span(&self, span: SwcSpan) -> Span {
        Span::new(self.origin.offset(span.lo), self.origin.offset(span.hi))
    }
}

/// Parses `source` as a TypeScript module with JSX enabled.
///
/// Recoverable errors that swc reports alongside a tree are treated the same
/// as fatal ones: the first error fails the whole file.
pub fn parse_tsx(source: &str, filename: &str) -> Result<ParsedFile, SyntaxError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(filename.to_string()).into(),
        source.to_string(),
    );
    let origin = FileOrigin::new(fm.start_pos, source);

    let syntax = Syntax::Typescript(TsSyntax {
        tsx: true,
        decorators: true,
        ..Default::default()
    });
    let mut parser = Parser::new(syntax, StringInput::from(&*fm), None);
    let result = parser.parse_module();
    let recovered = parser.take_errors();

    let module = result.map_err(|err| syntax_error(err, origin))?;
    if let Some(err) = recovered.into_iter().next() {
        return Err(syntax_error(err, origin));
    }

    Ok(ParsedFile { module, origin })
}

fn syntax_error(err: SwcError, origin: FileOrigin) -> SyntaxError {
    let span = err.span();
    let start = origin.offset(span.lo);
    let end = origin.offset(span.hi).max(start);
    SyntaxError::new(Span::new(start, end), err.kind().msg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{ModuleItem, Stmt};

    fn second_decl_span(source: &str) -> Span {
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        let ModuleItem::Stmt(Stmt::Decl(decl)) = &parsed.module.body[1] else {
            panic!("expected a declaration");
        };
        parsed.span(decl.as_var().unwrap().span)
    }

    #[test]
    fn test_parses_types_and_jsx_together() {
        let source = r#"
interface Props { a: number }
const view = (props: Props) => <div class="x">{props.a}</div>;
"#;
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn test_offsets_are_relative_to_the_file() {
        let source = "let a = 1;\nlet bb = 2;";
        let span = second_decl_span(source);
        assert_eq!(u32::from(span.start), 11);
        assert!(source[span.to_range()].starts_with("let bb = 2"));
    }

    #[test]
    fn test_offsets_count_a_leading_bom() {
        let source = "\u{feff}let a = 1;\nlet bb = 2;";
        let span = second_decl_span(source);
        assert_eq!(u32::from(span.start), 14);
        assert!(source[span.to_range()].starts_with("let bb = 2"));
    }

    #[test]
    fn test_reports_position_of_syntax_errors() {
        let source = "const a = ;";
        let err = parse_tsx(source, "input.tsx").err().unwrap();
        assert_eq!(u32::from(err.span.start), 10);
        assert!(!err.message.is_empty());

        let err = parse_tsx("\u{feff}const a = ;", "input.tsx").err().unwrap();
        assert_eq!(u32::from(err.span.start), 13);
    }

    #[test]
    fn test_rejects_unclosed_jsx() {
        assert!(parse_tsx("const a = <div>;", "input.tsx").is_err());
    }
}
