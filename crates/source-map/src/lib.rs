//! Position mapping for source-to-source rewrites.
//!
//! Rewrites in this workspace only ever insert text into an otherwise untouched
//! copy of the original file. This crate records which generated byte ranges
//! were copied from which original byte ranges, answers lookups in both
//! directions, and encodes the result as a standard Source Map v3 document for
//! bundlers and debuggers.

mod builder;
mod line_index;
mod span;
mod v3;

pub use builder::{Mapping, SourceMap, SourceMapBuilder};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
pub use v3::SourceMapV3;
