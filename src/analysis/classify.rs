//! Export classification.
//!
//! Walks the export statements of a parsed module in source order and
//! resolves every exported binding to the declaration behind it. Exports
//! that cannot be classified degrade to `SymbolShape::Unknown` and leave an
//! `UnsupportedExport` warning; they never abort the analysis.

use std::collections::HashSet;

use crate::diagnostic::{Diagnostic, Position};
use crate::parser::ast::{
    ClassShape, DeclForm, Declaration, DefaultExport, ExportItem, ExportStatement, Expr,
    MemberKind, Visibility,
};
use crate::parser::ParsedModule;

use super::{ExportSymbol, MethodSymbol, SymbolShape};

/// External name of the default export.
pub const DEFAULT_EXPORT: &str = "default";

/// How many `const a = b` hops are followed when resolving an alias.
const MAX_ALIAS_DEPTH: usize = 4;

/// Result of classifying a module's exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Exported symbols in export-statement order.
    pub symbols: Vec<ExportSymbol>,
    /// Non-fatal `UnsupportedExport` diagnostics.
    pub warnings: Vec<Diagnostic>,
}

/// Classify every export of a parsed module.
pub fn classify(module: &ParsedModule) -> Classification {
    Classifier::new(module).run()
}

struct Classifier<'m> {
    module: &'m ParsedModule,
    seen: HashSet<String>,
    result: Classification,
}

impl<'m> Classifier<'m> {
    fn new(module: &'m ParsedModule) -> Self {
        Self {
            module,
            seen: HashSet::new(),
            result: Classification::default(),
        }
    }

    fn run(mut self) -> Classification {
        let module = self.module;
        for stmt in &module.exports {
            self.statement(stmt);
        }
        log::debug!(
            "classified {} exports ({} warnings)",
            self.result.symbols.len(),
            self.result.warnings.len()
        );
        self.result
    }

    fn statement(&mut self, stmt: &ExportStatement) {
        match &stmt.item {
            ExportItem::Declarations(decls) => {
                for decl in decls {
                    if let DeclForm::Signature(_) = decl.form {
                        // Overloads are reported once, by their implementation
                        let merged = self
                            .module
                            .find_declaration(&decl.name)
                            .is_some_and(|d| !matches!(d.form, DeclForm::Signature(_)));
                        if merged || self.seen.contains(&decl.name) {
                            continue;
                        }
                    }
                    let shape = self.declaration_shape(decl, 0);
                    self.push(stmt, &decl.name, &decl.name, false, shape);
                }
            }
            ExportItem::Default(DefaultExport::Declaration(decl)) => {
                let shape = self.declaration_shape(decl, 0);
                self.push(stmt, DEFAULT_EXPORT, &decl.name, true, shape);
            }
            ExportItem::Default(DefaultExport::Expression(expr)) | ExportItem::Assignment(expr) => {
                let internal = match expr {
                    Expr::Identifier(name) => name.as_str(),
                    _ => DEFAULT_EXPORT,
                };
                let shape = self.expression_shape(expr);
                self.push(stmt, DEFAULT_EXPORT, internal, true, shape);
            }
            ExportItem::List {
                specifiers,
                source: None,
            } => {
                for spec in specifiers {
                    let shape = self.resolve(&spec.local, 0);
                    let is_default = spec.exported == DEFAULT_EXPORT;
                    self.push(stmt, &spec.exported, &spec.local, is_default, shape);
                }
            }
            ExportItem::List {
                specifiers,
                source: Some(source),
            } => {
                for spec in specifiers {
                    let reason = format!(
                        "`{}` is re-exported from '{}'; other modules are not analyzed",
                        spec.local, source
                    );
                    let is_default = spec.exported == DEFAULT_EXPORT;
                    self.push(stmt, &spec.exported, &spec.local, is_default, Err(reason));
                }
            }
            ExportItem::Namespace {
                alias: Some(alias),
                source,
            } => {
                let reason = format!(
                    "namespace re-export `{}` of '{}' is not analyzed",
                    alias, source
                );
                self.push(stmt, alias, alias, false, Err(reason));
            }
            ExportItem::Namespace {
                alias: None,
                source,
            } => {
                self.warn(
                    stmt,
                    format!("`export * from '{}'` exports no named binding here", source),
                );
            }
            ExportItem::Unsupported(what) => {
                self.warn(stmt, format!("unsupported export form `{}`", what));
            }
        }
    }

    /// Record one symbol. `Err` shapes degrade to Unknown with a warning.
    fn push(
        &mut self,
        stmt: &ExportStatement,
        external: &str,
        internal: &str,
        is_default: bool,
        shape: Result<SymbolShape, String>,
    ) {
        if !self.seen.insert(external.to_string()) {
            self.warn(stmt, format!("duplicate export `{}` ignored", external));
            return;
        }

        let shape = shape.unwrap_or_else(|reason| {
            self.warn(stmt, reason);
            SymbolShape::Unknown
        });

        self.result.symbols.push(ExportSymbol {
            external_name: external.to_string(),
            internal_name: internal.to_string(),
            is_default,
            shape,
            line: stmt.line,
        });
    }

    fn warn(&mut self, stmt: &ExportStatement, message: String) {
        log::warn!("line {}: {}", stmt.line, message);
        self.result.warnings.push(Diagnostic::unsupported_export(
            message,
            Some(Position::new(stmt.line, stmt.column)),
        ));
    }

    /// Resolve a local name through the module's top-level declarations.
    fn resolve(&self, name: &str, depth: usize) -> Result<SymbolShape, String> {
        if let Some(decl) = self.module.find_declaration(name) {
            return self.declaration_shape(decl, depth);
        }
        if self.module.is_imported(name) {
            return Err(format!(
                "`{}` is imported from another module; re-exports are not analyzed",
                name
            ));
        }
        Err(format!("`{}` is exported but never declared", name))
    }

    fn declaration_shape(&self, decl: &Declaration, depth: usize) -> Result<SymbolShape, String> {
        match &decl.form {
            DeclForm::Function(shape) | DeclForm::Signature(shape) => Ok(SymbolShape::Function {
                is_async: shape.is_async,
                params: shape.params.clone(),
            }),
            DeclForm::Class(class) => Ok(class_shape(class)),
            DeclForm::Variable { init } => Ok(match init {
                Some(Expr::Function(shape)) => SymbolShape::Function {
                    is_async: shape.is_async,
                    params: shape.params.clone(),
                },
                Some(Expr::Class(class)) => class_shape(class),
                // `export const alias = original;`
                Some(Expr::Identifier(target)) if depth < MAX_ALIAS_DEPTH && target != &decl.name => {
                    self.resolve(target, depth + 1)
                        .unwrap_or(SymbolShape::Variable)
                }
                _ => SymbolShape::Variable,
            }),
            DeclForm::Enum | DeclForm::Namespace => Ok(SymbolShape::Variable),
            DeclForm::TypeOnly => Err(format!(
                "`{}` is a type-only export with no runtime value",
                decl.name
            )),
            DeclForm::ImportAlias { target } => Err(format!(
                "`{}` aliases `{}`; import aliases are not analyzed",
                decl.name, target
            )),
        }
    }

    /// Shape of an inline `export default <expr>`.
    fn expression_shape(&self, expr: &Expr) -> Result<SymbolShape, String> {
        match expr {
            Expr::Function(shape) => Ok(SymbolShape::Function {
                is_async: shape.is_async,
                params: shape.params.clone(),
            }),
            Expr::Class(class) => Ok(class_shape(class)),
            Expr::Value => Ok(SymbolShape::Variable),
            Expr::Identifier(name) => self.resolve(name, 0),
            Expr::Other(kind) => Err(format!(
                "default export of a {} cannot be classified",
                kind.replace('_', " ")
            )),
        }
    }
}

/// Class shape with its stub-target methods.
///
/// Constructors, accessors, computed names and private or protected members
/// are never targets. A name appears once even when overloaded.
fn class_shape(class: &ClassShape) -> SymbolShape {
    let mut seen = HashSet::new();
    let methods = class
        .members
        .iter()
        .filter(|m| matches!(m.kind, MemberKind::Method | MemberKind::CallableField))
        .filter(|m| m.visibility == Visibility::Public && !m.is_computed)
        .filter(|m| seen.insert((m.name.clone(), m.is_static)))
        .map(|m| MethodSymbol {
            name: m.name.clone(),
            is_async: m.function.is_async,
            is_static: m.is_static,
            params: m.function.params.clone(),
        })
        .collect();

    SymbolShape::Class {
        constructor_params: class.constructor_params(),
        methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ExportKind;
    use crate::diagnostic::DiagnosticKind;
    use crate::parser::{parse, Dialect};

    fn classify_ts(source: &str) -> Classification {
        let module = parse(source, Dialect::TypeScript).expect("fixture should parse");
        classify(&module)
    }

    fn names(c: &Classification) -> Vec<(&str, &str, ExportKind)> {
        c.symbols
            .iter()
            .map(|s| (s.external_name.as_str(), s.internal_name.as_str(), s.kind()))
            .collect()
    }

    #[test]
    fn test_plain_function_export() {
        let c = classify_ts("export function f() {}\n");
        assert_eq!(names(&c), vec![("f", "f", ExportKind::Function)]);
        assert!(!c.symbols[0].is_default);
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn test_renamed_export_resolves_internal_name() {
        let c = classify_ts(
            "function iWillBeRenamed() { return true; }\nexport { iWillBeRenamed as iAmRenamed };\n",
        );
        assert_eq!(
            names(&c),
            vec![("iAmRenamed", "iWillBeRenamed", ExportKind::Function)]
        );
        assert!(c.symbols[0].is_renamed());
    }

    #[test]
    fn test_default_identifier_inherits_kind_and_async() {
        let c = classify_ts("async function iAmDefaultAndAsync() {}\nexport default iAmDefaultAndAsync;\n");
        assert_eq!(
            names(&c),
            vec![("default", "iAmDefaultAndAsync", ExportKind::Function)]
        );
        assert!(c.symbols[0].is_default);
        assert!(c.symbols[0].is_async());
    }

    #[test]
    fn test_as_default_in_list() {
        let c = classify_ts("async function run() {}\nexport { run as default };\n");
        assert_eq!(names(&c), vec![("default", "run", ExportKind::Function)]);
        assert!(c.symbols[0].is_default);
        assert!(c.symbols[0].is_async());
    }

    #[test]
    fn test_class_methods_in_order_without_constructor() {
        let c = classify_ts(
            r#"
export class iAmClass {
  constructor() {}
  async myAsync() { return await 'It takes some time' }
  myMethod(str: string) { return str }
  get size() { return 0 }
  private hidden() {}
}
"#,
        );
        let methods = c.symbols[0].methods();
        let summary: Vec<(&str, bool)> = methods.iter().map(|m| (m.name.as_str(), m.is_async)).collect();
        assert_eq!(summary, vec![("myAsync", true), ("myMethod", false)]);
    }

    #[test]
    fn test_aliases_are_not_deduplicated() {
        let c = classify_ts("function f() {}\nexport { f as a };\nexport { f as b };\n");
        assert_eq!(
            names(&c),
            vec![("a", "f", ExportKind::Function), ("b", "f", ExportKind::Function)]
        );
    }

    #[test]
    fn test_list_order_is_preserved() {
        let c = classify_ts("const x = 1;\nfunction y() {}\nclass Z {}\nexport { y, Z, x };\n");
        assert_eq!(
            names(&c),
            vec![
                ("y", "y", ExportKind::Function),
                ("Z", "Z", ExportKind::Class),
                ("x", "x", ExportKind::Variable),
            ]
        );
    }

    #[test]
    fn test_variable_initializers() {
        let c = classify_ts(
            r#"
export const answer = 42;
export const fetchAll = async (url: string) => [];
export const Widget = class { render() {} };
const original = async function () {};
export const alias = original;
"#,
        );
        assert_eq!(
            names(&c),
            vec![
                ("answer", "answer", ExportKind::Variable),
                ("fetchAll", "fetchAll", ExportKind::Function),
                ("Widget", "Widget", ExportKind::Class),
                ("alias", "alias", ExportKind::Function),
            ]
        );
        assert!(c.symbols[1].is_async());
        assert!(c.symbols[3].is_async());
    }

    #[test]
    fn test_unclassifiable_default_degrades() {
        let c = classify_ts("export default makeThing();\n");
        assert_eq!(names(&c), vec![("default", "default", ExportKind::Unknown)]);
        assert_eq!(c.warnings.len(), 1);
        assert_eq!(c.warnings[0].kind, DiagnosticKind::UnsupportedExport);
        assert_eq!(c.warnings[0].position.unwrap().line, 1);
    }

    #[test]
    fn test_type_only_and_undeclared_exports_are_unknown() {
        let c = classify_ts(
            "import { Thing } from './thing';\ninterface Shape {}\nexport { Shape, Thing, Missing };\n",
        );
        assert_eq!(
            names(&c),
            vec![
                ("Shape", "Shape", ExportKind::Unknown),
                ("Thing", "Thing", ExportKind::Unknown),
                ("Missing", "Missing", ExportKind::Unknown),
            ]
        );
        assert_eq!(c.warnings.len(), 3);
        assert!(c.warnings[1].message.contains("imported"));
    }

    #[test]
    fn test_reexports() {
        let c = classify_ts("export { a as b } from './a';\nexport * from './all';\nexport * as ns from './ns';\n");
        assert_eq!(
            names(&c),
            vec![("b", "a", ExportKind::Unknown), ("ns", "ns", ExportKind::Unknown)]
        );
        assert_eq!(c.warnings.len(), 3);
    }

    #[test]
    fn test_duplicate_external_name_is_dropped() {
        let c = classify_ts("function a() {}\nfunction b() {}\nexport { a as x };\nexport { b as x };\n");
        assert_eq!(names(&c), vec![("x", "a", ExportKind::Function)]);
        assert_eq!(c.warnings.len(), 1);
    }

    #[test]
    fn test_overloads_reported_once() {
        let c = classify_ts(
            r#"
export function pick(a: string): string;
export function pick(a: number): number;
export async function pick(a: any) { return a; }
"#,
        );
        assert_eq!(names(&c), vec![("pick", "pick", ExportKind::Function)]);
        assert!(c.symbols[0].is_async());
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn test_enum_and_namespace_are_variables() {
        let c = classify_ts("export enum Color { Red }\nexport namespace Util { export const x = 1; }\n");
        assert_eq!(
            names(&c),
            vec![
                ("Color", "Color", ExportKind::Variable),
                ("Util", "Util", ExportKind::Variable),
            ]
        );
    }

    #[test]
    fn test_import_alias_export_is_unknown() {
        let c = classify_ts("namespace B { export const c = 1; }\nexport import A = B.c;\n");
        assert_eq!(names(&c), vec![("A", "A", ExportKind::Unknown)]);
        assert_eq!(c.warnings.len(), 1);
        assert_eq!(c.warnings[0].kind, DiagnosticKind::UnsupportedExport);
        assert!(c.warnings[0].message.contains("B.c"));
    }

    #[test]
    fn test_static_and_callable_field_methods() {
        let c = classify_ts(
            "export class Api {\n  static create() { return new Api(); }\n  load = async () => {};\n}\n",
        );
        let methods = c.symbols[0].methods();
        assert_eq!(methods.len(), 2);
        assert!(methods[0].is_static);
        assert_eq!(methods[1].name, "load");
        assert!(methods[1].is_async);
    }
}
