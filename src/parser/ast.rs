//! Structural representation of a module's top level.
//!
//! Only the shapes that matter for export classification are kept: what a
//! declaration is (function, class, variable, ...), whether it is async,
//! its parameters, and which export statements reference it.

/// A placeholder-worthy function parameter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    /// Parameter name. Destructured parameters get a synthesized `argN` name.
    pub name: String,
    /// Whether this is a rest parameter (`...args`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: false,
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: true,
        }
    }
}

/// Shape of a callable (declaration, expression, arrow, or method).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionShape {
    pub is_async: bool,
    pub params: Vec<Param>,
}

/// Kind of class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    Method,
    Getter,
    Setter,
    /// A field whose initializer is a function or arrow.
    CallableField,
}

/// Member accessibility as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// `private`/`protected` modifiers or a `#name`.
    Hidden,
}

/// A class member that could be a stub target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMember {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Computed names (`[Symbol.iterator]()`) cannot be called by name.
    pub is_computed: bool,
    pub function: FunctionShape,
}

/// Shape of a class declaration or class expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassShape {
    pub members: Vec<ClassMember>,
}

impl ClassShape {
    /// Parameters of the explicit constructor, if any.
    pub fn constructor_params(&self) -> Vec<Param> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Constructor)
            .map(|m| m.function.params.clone())
            .unwrap_or_default()
    }
}

/// An expression, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Function(FunctionShape),
    Class(ClassShape),
    Identifier(String),
    /// Object/array/primitive literals and `new` expressions.
    Value,
    /// Any other expression form; carries the tree-sitter node kind.
    Other(String),
}

/// What a top-level declaration declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclForm {
    Function(FunctionShape),
    /// A bodyless overload or ambient function signature.
    Signature(FunctionShape),
    Class(ClassShape),
    Variable { init: Option<Expr> },
    Enum,
    Namespace,
    /// `interface` or `type` alias; has no runtime value.
    TypeOnly,
    /// TypeScript `import A = B.c`; `target` is the aliased entity name.
    ImportAlias { target: String },
}

/// A named top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub form: DeclForm,
    /// 1-indexed line of the declaration.
    pub line: usize,
}

/// One entry of an `export { .. }` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    /// Name inside the module.
    pub local: String,
    /// Name importers see.
    pub exported: String,
}

/// Payload of `export default ..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExport {
    /// A named declaration (`export default function foo() {}`).
    Declaration(Declaration),
    /// Any expression, including anonymous functions and classes.
    Expression(Expr),
}

/// What an export statement exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportItem {
    /// `export function f() {}`, `export const a = 1, b = 2;`, ...
    Declarations(Vec<Declaration>),
    Default(DefaultExport),
    /// `export { a, b as c }`, optionally re-exported `from '..'`.
    List {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    /// `export * from '..'` or `export * as ns from '..'`.
    Namespace { alias: Option<String>, source: String },
    /// TypeScript `export = expr`.
    Assignment(Expr),
    /// Recognized `export` syntax with no binding to classify
    /// (`export as namespace X`, ...).
    Unsupported(String),
}

/// A top-level export statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStatement {
    pub item: ExportItem,
    /// 1-indexed line of the `export` keyword.
    pub line: usize,
    /// 1-indexed column of the `export` keyword.
    pub column: usize,
}
