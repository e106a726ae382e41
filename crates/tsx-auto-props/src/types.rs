//! File-local interface and type alias declarations.
//!
//! Only flat member lists are understood. An alias whose right-hand side is
//! anything other than a type literal (a union, a conditional type, another
//! reference, ...) is recorded as having no members so lookups fail closed.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use swc_common::Span;
use swc_ecma_ast::{
    Expr, Lit, Module, TsInterfaceDecl, TsType, TsTypeAliasDecl, TsTypeElement,
};
use swc_ecma_visit::{Visit, VisitWith};

/// A named member of an interface body or type literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    pub name: SmolStr,
    pub span: Span,
}

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDeclaration {
    /// `interface Name { ... }`. `extends` clauses are not followed.
    Interface { members: Vec<MemberSignature> },
    /// `type Name = ...`; `members` is `None` unless the alias is a type literal.
    Alias { members: Option<Vec<MemberSignature>> },
}

impl TypeDeclaration {
    /// The member list this declaration stands for, if it is a flat one.
    pub fn members(&self) -> Option<&[MemberSignature]> {
        match self {
            Self::Interface { members } => Some(members),
            Self::Alias { members } => members.as_deref(),
        }
    }
}

/// All type declarations in a file, keyed by name.
///
/// When a name is declared more than once (declaration merging, shadowing in
/// nested namespaces) the first declaration in source order wins.
#[derive(Debug, Default)]
pub struct TypeDeclarations {
    by_name: FxHashMap<SmolStr, TypeDeclaration>,
}

impl TypeDeclarations {
    /// Collects every interface and type alias in `module`, at any depth.
    pub fn collect(module: &Module) -> Self {
        let mut declarations = Self::default();
        module.visit_with(&mut declarations);
        declarations
    }

    /// Looks up a declaration by exact name.
    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.by_name.get(name)
    }

    /// Returns the member list `name` resolves to, or `None` when the name is
    /// undeclared or not a flat member list.
    pub fn members_of(&self, name: &str) -> Option<&[MemberSignature]> {
        self.get(name)?.members()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn declare(&mut self, name: &str, declaration: TypeDeclaration) {
        self.by_name
            .entry(SmolStr::new(name))
            .or_insert(declaration);
    }
}

impl Visit for TypeDeclarations {
    fn visit_ts_interface_decl(&mut self, decl: &TsInterfaceDecl) {
        self.declare(
            &decl.id.sym,
            TypeDeclaration::Interface {
                members: member_signatures(&decl.body.body),
            },
        );
        decl.visit_children_with(self);
    }

    fn visit_ts_type_alias_decl(&mut self, decl: &TsTypeAliasDecl) {
        self.declare(
            &decl.id.sym,
            TypeDeclaration::Alias {
                members: type_literal_members(&decl.type_ann),
            },
        );
        decl.visit_children_with(self);
    }
}

/// Returns the members of `ty` if it is a (possibly parenthesized) type literal.
pub fn type_literal_members(ty: &TsType) -> Option<Vec<MemberSignature>> {
    match ty {
        TsType::TsTypeLit(lit) => Some(member_signatures(&lit.members)),
        TsType::TsParenthesizedType(paren) => type_literal_members(&paren.type_ann),
        _ => None,
    }
}

/// Extracts named members in declaration order.
///
/// Call, construct and index signatures have no name and are skipped, as are
/// computed keys.
pub fn member_signatures(elements: &[TsTypeElement]) -> Vec<MemberSignature> {
    elements
        .iter()
        .filter_map(|element| {
            let (key, computed, span) = match element {
                TsTypeElement::TsPropertySignature(sig) => (&sig.key, sig.computed, sig.span),
                TsTypeElement::TsMethodSignature(sig) => (&sig.key, sig.computed, sig.span),
                TsTypeElement::TsGetterSignature(sig) => (&sig.key, sig.computed, sig.span),
                TsTypeElement::TsSetterSignature(sig) => (&sig.key, sig.computed, sig.span),
                _ => return None,
            };
            if computed {
                return None;
            }
            let name = key_name(key)?;
            Some(MemberSignature { name, span })
        })
        .collect()
}

fn key_name(key: &Expr) -> Option<SmolStr> {
    match key {
        Expr::Ident(ident) => Some(SmolStr::new(&*ident.sym)),
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(SmolStr::new),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_tsx;

    fn collect(source: &str) -> TypeDeclarations {
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        TypeDeclarations::collect(&parsed.module)
    }

    fn names(members: Option<&[MemberSignature]>) -> Option<Vec<&str>> {
        members.map(|members| members.iter().map(|m| m.name.as_str()).collect())
    }

    #[test]
    fn test_interface_members_in_order() {
        let decls = collect(
            r#"interface Props<T> {
  a: number;
  b: { some: boolean };
  "data-id"?: string;
  onClick(e: MouseEvent): void;
  [key: string]: unknown;
  (): void;
}"#,
        );
        assert_eq!(
            names(decls.members_of("Props")),
            Some(vec!["a", "b", "data-id", "onClick"])
        );
    }

    #[test]
    fn test_alias_to_type_literal() {
        let decls = collect("type P1 = { a: 1 }; type P2 = ({ b: 2 });");
        assert_eq!(names(decls.members_of("P1")), Some(vec!["a"]));
        assert_eq!(names(decls.members_of("P2")), Some(vec!["b"]));
    }

    #[test]
    fn test_unsupported_aliases_have_no_members() {
        let decls = collect(
            r#"
type Cond = 1 extends 1 ? { foo: number } : { a: string };
type Union = { a: 1 } | { b: 2 };
type Inter = { a: 1 } & { b: 2 };
type Mapped = { [K in "a" | "b"]: K };
type Ref = Cond;
type Prim = string;
"#,
        );
        assert_eq!(decls.len(), 6);
        for name in ["Cond", "Union", "Inter", "Mapped", "Ref", "Prim"] {
            assert!(decls.get(name).is_some(), "{name} should be declared");
            assert_eq!(decls.members_of(name), None, "{name} should not resolve");
        }
    }

    #[test]
    fn test_first_declaration_wins() {
        let decls = collect(
            r#"
interface Props { first: string }
interface Props { second: string }
"#,
        );
        assert_eq!(names(decls.members_of("Props")), Some(vec!["first"]));
    }

    #[test]
    fn test_nested_declarations_are_found() {
        let decls = collect(
            r#"
export namespace Shapes { export interface Circle { radius: number } }
function local() { type Inner = { x: number }; return 1; }
"#,
        );
        assert_eq!(names(decls.members_of("Circle")), Some(vec!["radius"]));
        assert_eq!(names(decls.members_of("Inner")), Some(vec!["x"]));
        assert!(decls.get("Missing").is_none());
    }

    #[test]
    fn test_computed_keys_are_skipped() {
        let decls = collect(r#"const k = "x"; type P = { [k]: number; y: number };"#);
        assert_eq!(names(decls.members_of("P")), Some(vec!["y"]));
    }
}
