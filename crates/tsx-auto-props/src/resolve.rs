//! Property name resolution for component factory calls.
//!
//! A call is classified into one of three shapes, checked in this order:
//!
//! 1. explicit type argument: `defineComponent<Props>(...)`
//! 2. configuration object: `defineComponent({ setup(props: Props) { ... } })`
//! 3. function argument: `defineComponent((props: Props) => ...)`
//!
//! The type found for the shape is then reduced to a flat list of member names,
//! either written inline or by looking up a local interface or type alias.
//! Anything that cannot be understood with certainty yields no names.

use crate::types::{member_signatures, MemberSignature, TypeDeclarations};
use indexmap::IndexSet;
use smol_str::SmolStr;
use swc_ecma_ast::{
    ArrowExpr, CallExpr, Expr, ExprOrSpread, Function, ObjectLit, Pat, Prop, PropName,
    PropOrSpread, TsEntityName, TsType,
};

/// Ordered, duplicate-free property names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyNameSet(IndexSet<SmolStr>);

impl PropertyNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_members(members: &[MemberSignature]) -> Self {
        members.iter().map(|member| member.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(SmolStr::as_str)
    }

    /// Renders the names as a JSON array literal, e.g. `["a","b"]`.
    pub fn to_json_array(&self) -> String {
        serde_json::Value::Array(
            self.iter()
                .map(|name| serde_json::Value::String(name.to_string()))
                .collect(),
        )
        .to_string()
    }
}

impl FromIterator<SmolStr> for PropertyNameSet {
    fn from_iter<I: IntoIterator<Item = SmolStr>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Why a call site gets no props metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The configuration object already has a `props` entry.
    ExplicitProps,
    /// No arguments, spread arguments, or arguments of the wrong kind.
    UnsupportedCallShape,
    /// The configuration object has no function-valued `setup` entry.
    NoSetupFunction,
    /// The props parameter is missing or has no type annotation.
    MissingAnnotation,
    /// The type is neither a type literal nor a reference to a local one.
    UnsupportedType,
    /// The referenced type is not declared in this file, or is not a flat
    /// member list.
    UnresolvedType(SmolStr),
    /// The type resolved to a member list without named members.
    NoMembers,
}

/// The syntactic shape of a factory call.
#[derive(Clone, Copy)]
pub enum CallShape<'a> {
    /// `factory<T>(...)`: the first type argument decides.
    TypeArgument(&'a TsType),
    /// `factory({ ... })`
    ConfigObject(&'a ObjectLit),
    /// `factory(fn)` or `factory(fn, { ... })`
    Function {
        function: FunctionLike<'a>,
        options: Option<&'a ObjectLit>,
    },
    Unsupported,
}

/// An arrow function, function expression or object method.
#[derive(Clone, Copy)]
pub enum FunctionLike<'a> {
    Arrow(&'a ArrowExpr),
    Function(&'a Function),
}

impl<'a> FunctionLike<'a> {
    fn from_expr(expr: &'a Expr) -> Option<Self> {
        match unwrap_parens(expr) {
            Expr::Arrow(arrow) => Some(Self::Arrow(arrow)),
            Expr::Fn(func) => Some(Self::Function(&func.function)),
            _ => None,
        }
    }

    fn first_param(&self) -> Option<&'a Pat> {
        match self {
            Self::Arrow(arrow) => arrow.params.first(),
            Self::Function(func) => func.params.first().map(|param| &param.pat),
        }
    }
}

/// Classifies a call by its type arguments and arguments.
pub fn classify(call: &CallExpr) -> CallShape<'_> {
    if let Some(type_args) = &call.type_args {
        return match type_args.params.first() {
            Some(ty) => CallShape::TypeArgument(ty),
            None => CallShape::Unsupported,
        };
    }

    if call.args.iter().any(|arg| arg.spread.is_some()) {
        return CallShape::Unsupported;
    }

    match call.args.as_slice() {
        [only] => match unwrap_parens(&only.expr) {
            Expr::Object(obj) => CallShape::ConfigObject(obj),
            expr => match FunctionLike::from_expr(expr) {
                Some(function) => CallShape::Function {
                    function,
                    options: None,
                },
                None => CallShape::Unsupported,
            },
        },
        [first, ExprOrSpread { expr: second, .. }] => {
            match (
                FunctionLike::from_expr(&first.expr),
                unwrap_parens(second),
            ) {
                (Some(function), Expr::Object(options)) => CallShape::Function {
                    function,
                    options: Some(options),
                },
                _ => CallShape::Unsupported,
            }
        }
        _ => CallShape::Unsupported,
    }
}

/// Resolves property names against the type declarations of one file.
pub struct PropertyResolver<'a> {
    declarations: &'a TypeDeclarations,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(declarations: &'a TypeDeclarations) -> Self {
        Self { declarations }
    }

    /// Resolves the property names declared for a factory call.
    ///
    /// The returned set is never empty.
    pub fn resolve(&self, call: &CallExpr) -> Result<PropertyNameSet, SkipReason> {
        let names = match classify(call) {
            CallShape::TypeArgument(ty) => self.resolve_type(ty)?,
            CallShape::ConfigObject(obj) => {
                if has_entry(obj, "props") {
                    return Err(SkipReason::ExplicitProps);
                }
                let setup = setup_function(obj).ok_or(SkipReason::NoSetupFunction)?;
                self.resolve_first_param(setup)?
            }
            CallShape::Function { function, options } => {
                if options.is_some_and(|obj| has_entry(obj, "props")) {
                    return Err(SkipReason::ExplicitProps);
                }
                self.resolve_first_param(function)?
            }
            CallShape::Unsupported => return Err(SkipReason::UnsupportedCallShape),
        };

        if names.is_empty() {
            Err(SkipReason::NoMembers)
        } else {
            Ok(names)
        }
    }

    /// Like [`resolve`](Self::resolve), but maps every skip to the empty set.
    pub fn property_names(&self, call: &CallExpr) -> PropertyNameSet {
        self.resolve(call).unwrap_or_default()
    }

    fn resolve_first_param(&self, function: FunctionLike<'_>) -> Result<PropertyNameSet, SkipReason> {
        let ty = function
            .first_param()
            .and_then(param_annotation)
            .ok_or(SkipReason::MissingAnnotation)?;
        self.resolve_type(ty)
    }

    /// Reduces a type to member names: inline type literals directly, simple
    /// type references through the file's declarations. Type arguments on a
    /// reference (`Props<T>`) do not take part in the lookup.
    fn resolve_type(&self, ty: &TsType) -> Result<PropertyNameSet, SkipReason> {
        match ty {
            TsType::TsTypeLit(lit) => Ok(PropertyNameSet::from_members(&member_signatures(
                &lit.members,
            ))),
            TsType::TsParenthesizedType(paren) => self.resolve_type(&paren.type_ann),
            TsType::TsTypeRef(reference) => match &reference.type_name {
                TsEntityName::Ident(ident) => self
                    .declarations
                    .members_of(&ident.sym)
                    .map(PropertyNameSet::from_members)
                    .ok_or_else(|| SkipReason::UnresolvedType(SmolStr::new(&*ident.sym))),
                _ => Err(SkipReason::UnsupportedType),
            },
            _ => Err(SkipReason::UnsupportedType),
        }
    }
}

/// The type annotation of a parameter pattern, looking through defaults.
fn param_annotation(pat: &Pat) -> Option<&TsType> {
    let ann = match pat {
        Pat::Ident(ident) => ident.type_ann.as_deref(),
        Pat::Object(obj) => obj.type_ann.as_deref(),
        Pat::Array(arr) => arr.type_ann.as_deref(),
        Pat::Assign(assign) => return param_annotation(&assign.left),
        _ => None,
    }?;
    Some(&*ann.type_ann)
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        _ => expr,
    }
}

fn prop_name(key: &PropName) -> Option<&str> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str()),
        PropName::Str(s) => s.value.as_str(),
        _ => None,
    }
}

/// Named, non-computed entries of an object literal. Spreads are skipped.
fn entries(obj: &ObjectLit) -> impl Iterator<Item = (&str, &Prop)> {
    obj.props.iter().filter_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let name: &str = match prop.as_ref() {
            Prop::KeyValue(kv) => prop_name(&kv.key)?,
            Prop::Method(method) => prop_name(&method.key)?,
            Prop::Getter(getter) => prop_name(&getter.key)?,
            Prop::Setter(setter) => prop_name(&setter.key)?,
            Prop::Shorthand(ident) => ident.sym.as_str(),
            Prop::Assign(_) => return None,
        };
        Some((name, prop.as_ref()))
    })
}

fn has_entry(obj: &ObjectLit, name: &str) -> bool {
    entries(obj).any(|(key, _)| key == name)
}

fn setup_function(obj: &ObjectLit) -> Option<FunctionLike<'_>> {
    let (_, prop) = entries(obj).find(|(key, _)| *key == "setup")?;
    match prop {
        Prop::KeyValue(kv) => FunctionLike::from_expr(&kv.value),
        Prop::Method(method) => Some(FunctionLike::Function(&method.function)),
        _ => None,
    }
}
