//! Type-derived `props` metadata for Vue TSX components.
//!
//! Vue decides whether an attribute passed to a component is a prop or a
//! fallthrough attribute by looking at the component's `props` option.
//! Function components written as `defineComponent((props: Props) => ...)`
//! declare their props only as a TypeScript type, which is gone at runtime.
//! This crate reads that type at build time and appends
//!
//! ```text
//! Object.defineProperty(Name, "props", {
//!   value: ["a","b"],
//! });
//! ```
//!
//! after each `const Name = defineComponent(...)` declaration. Only types
//! written inline or declared as an interface or type alias in the same file
//! are understood; everything else is left alone.
//!
//! # Example
//!
//! ```
//! use vue_tsx_auto_props::transform;
//!
//! let source = r#"
//! import { defineComponent } from "vue";
//!
//! interface Props { msg: string; count: number }
//!
//! export const Hello = defineComponent((props: Props) => () => (
//!   <p>{props.msg} x{props.count}</p>
//! ));
//! "#;
//!
//! let result = transform(source).unwrap().expect("file is rewritten");
//! assert!(result.code.contains(r#"value: ["msg","count"]"#));
//! ```
//!
//! [`transform`] runs the whole pipeline. The stages are public for tools that
//! want to inspect a file without rewriting it: [`parse_tsx`],
//! [`factory_bindings`], [`for_each_call_site`], [`PropertyResolver`] and
//! [`apply_insertions`].

mod call_sites;
mod error;
mod imports;
mod parse;
mod patch;
mod resolve;
mod transform;
mod types;

pub use call_sites::{
    annotated_components, for_each_call_site, Annotations, ComponentCallSite, ScopeId,
};
pub use error::{SyntaxError, TransformError};
pub use imports::{
    factory_bindings, import_records, ImportBinding, ImportRecord, FACTORY_MODULE, FACTORY_NAME,
};
pub use parse::{parse_tsx, ParsedFile};
pub use patch::{apply_insertions, define_props_statement, Insertion, Patched};
pub use resolve::{classify, CallShape, FunctionLike, PropertyNameSet, PropertyResolver, SkipReason};
pub use types::{MemberSignature, TypeDeclaration, TypeDeclarations};
pub use source_map::{SourceMap, SourceMapV3};
pub use transform::{
    transform, transform_with_options, InjectedProps, RewriteResult, TransformOptions,
    DEFAULT_FILENAME,
};
