//! Eligibility: does the file import the component factory from Vue?

use smol_str::SmolStr;
use swc_ecma_ast::{ImportDecl, ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem};

/// The module the component factory must be imported from.
pub const FACTORY_MODULE: &str = "vue";

/// The component factory's exported name.
pub const FACTORY_NAME: &str = "defineComponent";

/// A value import declaration, reduced to its named specifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// The module source string.
    pub module: SmolStr,
    /// Named value bindings introduced by the declaration.
    pub bindings: Vec<ImportBinding>,
}

/// `imported as local`; both are equal when the specifier has no alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub imported: SmolStr,
    pub local: SmolStr,
}

impl ImportRecord {
    fn from_decl(decl: &ImportDecl) -> Option<Self> {
        if decl.type_only {
            return None;
        }
        let module = SmolStr::new(decl.src.value.as_str()?);
        let bindings = decl
            .specifiers
            .iter()
            .filter_map(|specifier| {
                // Default and namespace imports never name the factory directly.
                let ImportSpecifier::Named(named) = specifier else {
                    return None;
                };
                if named.is_type_only {
                    return None;
                }
                let local = SmolStr::new(&*named.local.sym);
                let imported = match &named.imported {
                    None => local.clone(),
                    Some(ModuleExportName::Ident(ident)) => SmolStr::new(&*ident.sym),
                    Some(ModuleExportName::Str(name)) => SmolStr::new(name.value.as_str()?),
                };
                Some(ImportBinding { imported, local })
            })
            .collect();

        Some(Self { module, bindings })
    }
}

/// Collects the top-level value imports of a module, in source order.
pub fn import_records(module: &Module) -> Vec<ImportRecord> {
    module
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => ImportRecord::from_decl(decl),
            _ => None,
        })
        .collect()
}

/// Returns the local names under which the factory is imported from
/// [`FACTORY_MODULE`]. An empty result means the file is not eligible.
pub fn factory_bindings(module: &Module) -> Vec<SmolStr> {
    let mut locals: Vec<SmolStr> = Vec::new();
    for record in import_records(module) {
        if record.module != FACTORY_MODULE {
            continue;
        }
        for binding in record.bindings {
            if binding.imported == FACTORY_NAME && !locals.contains(&binding.local) {
                locals.push(binding.local);
            }
        }
    }
    locals
}
