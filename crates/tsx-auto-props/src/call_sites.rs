//! Locating variable-bound component factory calls.

use crate::parse::ParsedFile;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use swc_common::{Span as SwcSpan, DUMMY_SP};
use swc_ecma_ast::{
    AssignExpr, AssignTarget, BlockStmt, CallExpr, Callee, Decl, Expr, Lit, MemberExpr,
    MemberProp, Pat, SimpleAssignTarget, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

/// The block a statement belongs to, or the module for top-level code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(SwcSpan);

impl ScopeId {
    pub const MODULE: ScopeId = ScopeId(DUMMY_SP);

    fn of_block(block: &BlockStmt) -> Self {
        Self(block.span)
    }
}

/// A `const Name = factory(...)` binding found in the tree.
///
/// Borrows from the syntax tree, so it only lives for the duration of the
/// callback it is handed to.
#[derive(Debug, Clone, Copy)]
pub struct ComponentCallSite<'a> {
    /// The bound identifier.
    pub name: &'a str,
    /// The factory call.
    pub call: &'a CallExpr,
    /// Byte offset just past the call's closing parenthesis.
    pub call_end: usize,
    /// Byte offset just past the declaration statement containing the call,
    /// including its `;`. Generated statements go here.
    pub statement_end: usize,
    /// Whether the declaration statement is terminated by a `;`.
    pub terminated: bool,
    /// The block the declaration sits in.
    pub scope: ScopeId,
}

/// Visits every factory-call binding introduced by a declaration statement.
///
/// Only `Decl` nodes are considered, which excludes `for (const x = ...;;)`
/// heads and `export default factory(...)`. Destructuring bindings are
/// skipped.
pub fn for_each_call_site<F>(parsed: &ParsedFile, source: &str, factories: &[SmolStr], f: F)
where
    F: FnMut(ComponentCallSite<'_>),
{
    let mut locator = CallSiteLocator {
        parsed,
        source,
        factories,
        scopes: vec![ScopeId::MODULE],
        on_site: f,
    };
    parsed.module.visit_with(&mut locator);
}

struct CallSiteLocator<'a, F> {
    parsed: &'a ParsedFile,
    source: &'a str,
    factories: &'a [SmolStr],
    scopes: Vec<ScopeId>,
    on_site: F,
}

impl<F> CallSiteLocator<'_, F>
where
    F: FnMut(ComponentCallSite<'_>),
{
    fn is_factory(&self, call: &CallExpr) -> bool {
        let Callee::Expr(callee) = &call.callee else {
            return false;
        };
        let Expr::Ident(ident) = callee.as_ref() else {
            return false;
        };
        self.factories.iter().any(|name| name.as_str() == &*ident.sym)
    }

    fn visit_var_statement(&mut self, var: &VarDecl) {
        if var.declare {
            return;
        }
        let (statement_end, terminated) =
            statement_end(self.source, self.parsed.offset(var.span.hi));

        for declarator in &var.decls {
            let Pat::Ident(binding) = &declarator.name else {
                continue;
            };
            let Some(Expr::Call(call)) = declarator.init.as_deref() else {
                continue;
            };
            if !self.is_factory(call) {
                continue;
            }
            tracing::trace!(name = %binding.id.sym, "found component factory call");
            let site = ComponentCallSite {
                name: binding.id.sym.as_str(),
                call,
                call_end: self.parsed.offset(call.span.hi),
                statement_end,
                terminated,
                scope: self.scopes.last().copied().unwrap_or(ScopeId::MODULE),
            };
            (self.on_site)(site);
        }
    }
}

impl<F> Visit for CallSiteLocator<'_, F>
where
    F: FnMut(ComponentCallSite<'_>),
{
    fn visit_decl(&mut self, decl: &Decl) {
        if let Decl::Var(var) = decl {
            self.visit_var_statement(var);
        }
        decl.visit_children_with(self);
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        self.scopes.push(ScopeId::of_block(block));
        block.visit_children_with(self);
        self.scopes.pop();
    }
}

/// Finds where a declaration statement really ends.
///
/// Returns the offset after the statement's `;` (looking past blanks on the
/// same line in case the span stops short of it) and whether one was found.
fn statement_end(source: &str, span_end: usize) -> (usize, bool) {
    let span_end = span_end.min(source.len());
    if source[..span_end].ends_with(';') {
        return (span_end, true);
    }
    let rest = &source[span_end..];
    let blanks = rest.len() - rest.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
    if rest[blanks..].starts_with(';') {
        (span_end + blanks + 1, true)
    } else {
        (span_end, false)
    }
}

/// Props metadata already present in a file.
#[derive(Debug, Default)]
pub struct Annotations {
    /// For each target name, the blocks whose bindings the annotations can see.
    visible: FxHashMap<SmolStr, FxHashSet<ScopeId>>,
}

impl Annotations {
    /// Whether `name`, declared in `scope`, already has props attached.
    ///
    /// An annotation counts when it sits in `scope` or in a block nested
    /// inside it. Shadowing by an intermediate block is not tracked.
    pub fn covers(&self, name: &str, scope: ScopeId) -> bool {
        self.visible
            .get(name)
            .is_some_and(|scopes| scopes.contains(&scope))
    }
}

/// Collects existing props metadata: `Object.defineProperty(Name, "props", ...)`,
/// `Name.props = ...` and `Name["props"] = ...`.
pub fn annotated_components(parsed: &ParsedFile) -> Annotations {
    let mut finder = AnnotationFinder {
        scopes: vec![ScopeId::MODULE],
        found: Annotations::default(),
    };
    parsed.module.visit_with(&mut finder);
    finder.found
}

struct AnnotationFinder {
    scopes: Vec<ScopeId>,
    found: Annotations,
}

impl AnnotationFinder {
    fn record(&mut self, name: SmolStr) {
        self.found
            .visible
            .entry(name)
            .or_default()
            .extend(self.scopes.iter().copied());
    }
}

impl Visit for AnnotationFinder {
    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        self.scopes.push(ScopeId::of_block(block));
        block.visit_children_with(self);
        self.scopes.pop();
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Some(name) = define_property_target(call) {
            self.record(name);
        }
        call.visit_children_with(self);
    }

    fn visit_assign_expr(&mut self, assign: &AssignExpr) {
        if let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left {
            if let Some(name) = props_member_target(member) {
                self.record(name);
            }
        }
        assign.visit_children_with(self);
    }
}

fn define_property_target(call: &CallExpr) -> Option<SmolStr> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = callee.as_ref() else {
        return None;
    };
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    let MemberProp::Ident(method) = &member.prop else {
        return None;
    };
    if &*object.sym != "Object" || &*method.sym != "defineProperty" {
        return None;
    }

    let [target, key, ..] = call.args.as_slice() else {
        return None;
    };
    let Expr::Ident(target) = target.expr.as_ref() else {
        return None;
    };
    match key.expr.as_ref() {
        Expr::Lit(Lit::Str(key)) if key.value.as_str() == Some("props") => {
            Some(SmolStr::new(&*target.sym))
        }
        _ => None,
    }
}

fn props_member_target(member: &MemberExpr) -> Option<SmolStr> {
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    let is_props = match &member.prop {
        MemberProp::Ident(prop) => &*prop.sym == "props",
        MemberProp::Computed(computed) => matches!(
            computed.expr.as_ref(),
            Expr::Lit(Lit::Str(key)) if key.value.as_str() == Some("props")
        ),
        _ => false,
    };
    is_props.then(|| SmolStr::new(&*object.sym))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_tsx;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Eq)]
    struct Site {
        name: String,
        call_end: usize,
        statement_end: usize,
        terminated: bool,
    }

    fn sites(source: &str) -> Vec<Site> {
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        let factories = [SmolStr::new("defineComponent")];
        let mut found = Vec::new();
        for_each_call_site(&parsed, source, &factories, |site| {
            found.push(Site {
                name: site.name.to_string(),
                call_end: site.call_end,
                statement_end: site.statement_end,
                terminated: site.terminated,
            });
        });
        found
    }

    fn names(source: &str) -> Vec<String> {
        sites(source).into_iter().map(|site| site.name).collect()
    }

    #[test]
    fn test_records_offsets() {
        let source = "const Foo = defineComponent(() => null);\nlet x = 1;";
        let call_end = source.find(");").unwrap() + 1;
        assert_eq!(
            sites(source),
            vec![Site {
                name: "Foo".to_string(),
                call_end,
                statement_end: call_end + 1,
                terminated: true,
            }]
        );
    }

    #[test]
    fn test_unterminated_statement() {
        let source = "const Foo = defineComponent(() => null)\nlet x = 1";
        let call_end = source.find(")\n").unwrap() + 1;
        let found = sites(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].call_end, call_end);
        assert_eq!(found[0].statement_end, call_end);
        assert!(!found[0].terminated);
    }

    #[test]
    fn test_finds_exported_and_nested_bindings_in_order() {
        let source = r#"
export const A = defineComponent(() => null);
let B = defineComponent(() => null), C = defineComponent(() => null);
function make() {
  var D = defineComponent(() => null);
  return D;
}
"#;
        assert_eq!(names(source), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_declarators_in_one_statement_share_the_insertion_point() {
        let source = "const B = defineComponent(() => 1), C = defineComponent(() => 2);";
        let found = sites(source);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].statement_end, source.len());
        assert_eq!(found[1].statement_end, source.len());
        assert!(found[0].call_end < found[1].call_end);
    }

    #[test]
    fn test_skips_non_bindings() {
        let source = r#"
export default defineComponent(() => null);
const { a } = defineComponent(() => null);
const [b] = defineComponent(() => null);
const c = other(() => null);
const d = obj.defineComponent(() => null);
const e = (defineComponent(() => null));
for (const f = defineComponent(() => null); ; ) break;
defineComponent(() => null);
declare const g: ReturnType<typeof defineComponent>;
"#;
        assert!(sites(source).is_empty());
    }

    #[test]
    fn test_statement_end_looks_past_blanks() {
        assert_eq!(statement_end("a = 1 ;", 5), (7, true));
        assert_eq!(statement_end("a = 1;", 6), (6, true));
        assert_eq!(statement_end("a = 1\n;", 5), (5, false));
        assert_eq!(statement_end("a = 1", 5), (5, false));
    }

    #[test]
    fn test_finds_annotated_components() {
        let source = r#"
const A = 1, B = 2, C = 3, D = 4;
Object.defineProperty(A, "props", { value: ["x"] });
B.props = ["y"];
C["props"] = ["z"];
Object.defineProperty(D, "name", { value: "D" });
"#;
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        let annotated = annotated_components(&parsed);
        for name in ["A", "B", "C"] {
            assert!(annotated.covers(name, ScopeId::MODULE), "{name}");
        }
        assert!(!annotated.covers("D", ScopeId::MODULE));
    }

    #[test]
    fn test_annotations_only_cover_enclosing_scopes() {
        let source = r#"
A.props = ["x"];
function make() {
  const A = defineComponent((props: { a: 1 }) => null);
  const B = defineComponent((props: { b: 1 }) => null);
  if (A) {
    B.props = ["b"];
  }
  return A;
}
"#;
        let parsed = parse_tsx(source, "input.tsx").unwrap();
        let annotated = annotated_components(&parsed);
        let factories = [SmolStr::new("defineComponent")];
        let mut covered = Vec::new();
        for_each_call_site(&parsed, source, &factories, |site| {
            assert_ne!(site.scope, ScopeId::MODULE);
            covered.push((site.name.to_string(), annotated.covers(site.name, site.scope)));
        });
        assert_eq!(
            covered,
            vec![("A".to_string(), false), ("B".to_string(), true)]
        );
        assert!(annotated.covers("A", ScopeId::MODULE));
    }
}
