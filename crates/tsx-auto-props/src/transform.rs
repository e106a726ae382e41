//! The per-file rewrite pipeline.

use crate::call_sites::{annotated_components, for_each_call_site};
use crate::error::TransformError;
use crate::imports::factory_bindings;
use crate::parse::parse_tsx;
use crate::patch::{apply_insertions, define_props_statement, Insertion};
use crate::resolve::{PropertyNameSet, PropertyResolver};
use crate::types::TypeDeclarations;
use smol_str::SmolStr;
use source_map::{SourceMap, SourceMapV3};

/// Source name used in diagnostics and source maps when none is given.
pub const DEFAULT_FILENAME: &str = "input.tsx";

/// Options for transformation.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// The name of the file being transformed.
    pub filename: Option<String>,
}

impl TransformOptions {
    /// Returns the filename, or [`DEFAULT_FILENAME`].
    pub fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(DEFAULT_FILENAME)
    }
}

/// Props metadata injected for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedProps {
    /// The component's binding name.
    pub component: SmolStr,
    /// The injected property names.
    pub props: PropertyNameSet,
}

/// A performed rewrite.
#[derive(Debug)]
pub struct RewriteResult {
    /// The rewritten source.
    pub code: String,
    /// Byte-level mapping from `code` back to the input.
    pub source_map: SourceMap,
    /// The same mapping as a Source Map v3 document.
    pub map: SourceMapV3,
    /// What was injected, in source order.
    pub components: Vec<InjectedProps>,
}

/// Rewrites `source` with default options.
///
/// Returns `Ok(None)` when the file does not import `defineComponent` from
/// `vue` or when no factory call has resolvable props; the caller should then
/// use the input unchanged.
pub fn transform(source: &str) -> Result<Option<RewriteResult>, TransformError> {
    transform_with_options(source, &TransformOptions::default())
}

/// Rewrites `source`, attaching type-derived `props` metadata to every
/// `const Name = defineComponent(...)` whose props type can be resolved.
pub fn transform_with_options(
    source: &str,
    options: &TransformOptions,
) -> Result<Option<RewriteResult>, TransformError> {
    let filename = options.filename();
    let parsed = parse_tsx(source, filename)?;

    let factories = factory_bindings(&parsed.module);
    if factories.is_empty() {
        tracing::debug!(filename, "no defineComponent import from vue, skipping");
        return Ok(None);
    }

    let declarations = TypeDeclarations::collect(&parsed.module);
    let resolver = PropertyResolver::new(&declarations);
    let annotated = annotated_components(&parsed);

    let mut insertions = Vec::new();
    let mut components = Vec::new();
    for_each_call_site(&parsed, source, &factories, |site| {
        if annotated.covers(site.name, site.scope) {
            tracing::debug!(component = site.name, "props already attached, skipping");
            return;
        }
        match resolver.resolve(site.call) {
            Ok(props) => {
                tracing::debug!(
                    component = site.name,
                    props = %props.to_json_array(),
                    "injecting props"
                );
                insertions.push(Insertion::new(
                    site.statement_end,
                    define_props_statement(site.name, &props, site.terminated),
                ));
                components.push(InjectedProps {
                    component: SmolStr::new(site.name),
                    props,
                });
            }
            Err(reason) => {
                tracing::debug!(component = site.name, ?reason, "not injecting props");
            }
        }
    });

    if insertions.is_empty() {
        return Ok(None);
    }

    tracing::debug!(filename, count = insertions.len(), "rewriting file");
    let patched = apply_insertions(source, insertions);
    let mut map = patched.source_map.to_v3(&patched.code, source, filename);
    if let Some(file) = &options.filename {
        map = map.with_file(file.clone());
    }

    Ok(Some(RewriteResult {
        code: patched.code,
        source_map: patched.source_map,
        map,
        components,
    }))
}
