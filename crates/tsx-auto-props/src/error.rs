//! Transform error types.

use source_map::Span;
use thiserror::Error;

/// A file could not be parsed as TSX.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {}: {message}", u32::from(.span.start))]
pub struct SyntaxError {
    /// Byte range the parser blamed.
    pub span: Span,
    /// The parser's diagnostic message.
    pub message: String,
}

impl SyntaxError {
    /// Creates a new syntax error.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// An error that aborts the transform of a single file.
///
/// Files that simply have nothing to rewrite are not errors; see
/// [`crate::transform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The source is not valid TSX.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl TransformError {
    /// Returns the span the error refers to.
    pub fn span(&self) -> Span {
        match self {
            Self::Syntax(err) => err.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TransformError::from(SyntaxError::new(
            Span::new(12u32, 13u32),
            "Expression expected",
        ));
        assert_eq!(error.to_string(), "syntax error at 12: Expression expected");
        assert_eq!(error.span(), Span::new(12u32, 13u32));
    }
}
