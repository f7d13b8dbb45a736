//! Template synthesis: classified exports to test-stub text.
//!
//! One `describe` block is rendered per export symbol, in the order the
//! symbols are given, after a single import statement that pulls every
//! export in from the module under test. Rendering is pure: it never looks
//! at source text and the same symbols always yield the same text.

pub mod ident;
mod writer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{ExportSymbol, SymbolShape};
use crate::parser::ast::Param;
use ident::{is_binding_name, is_identifier_name, member_access, quote, Bindings};
use writer::CodeWriter;

/// Marker emitted for a module without exports.
pub const NO_EXPORTS_MARKER: &str = "// zubora: no exports found in this module";

/// Local binding preferred for the default export.
const DEFAULT_BINDING: &str = "defaultExport";

/// Which test runner the scaffold targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStyle {
    /// Globals `describe`/`test`/`expect`.
    #[default]
    Jest,
    /// Same API, imported from `vitest`.
    Vitest,
}

impl TestStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStyle::Jest => "jest",
            TestStyle::Vitest => "vitest",
        }
    }

    /// Import line the style needs before the module import, if any.
    fn prelude(&self) -> Option<&'static str> {
        match self {
            TestStyle::Jest => None,
            TestStyle::Vitest => Some("import { describe, expect, test } from 'vitest';"),
        }
    }
}

impl fmt::Display for TestStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TestStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jest" => Ok(TestStyle::Jest),
            "vitest" => Ok(TestStyle::Vitest),
            _ => anyhow::bail!("invalid style {:?}, must be 'jest' or 'vitest'", s),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Specifier the scaffold imports the module under test from.
    pub module_path: String,
    pub style: TestStyle,
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            module_path: "./module".to_string(),
            style: TestStyle::Jest,
            indent: 2,
        }
    }
}

/// Renders test scaffolds from classified exports.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: TemplateOptions,
}

impl Synthesizer {
    pub fn new(options: TemplateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    /// Render the scaffold for `symbols`.
    pub fn render(&self, symbols: &[ExportSymbol]) -> String {
        if symbols.is_empty() {
            return format!("{}\n", NO_EXPORTS_MARKER);
        }

        let plan = ImportPlan::new(symbols);
        let mut w = CodeWriter::new(self.options.indent);

        if let Some(prelude) = self.options.style.prelude() {
            w.line(prelude);
        }
        w.line(plan.statement(&self.options.module_path));

        for (symbol, local) in symbols.iter().zip(&plan.locals) {
            w.blank();
            self.block(&mut w, symbol, local, &plan.scope);
        }

        w.finish()
    }

    fn block(&self, w: &mut CodeWriter, symbol: &ExportSymbol, local: &str, scope: &Bindings) {
        w.open(format!("describe({}, () => {{", quote(&symbol.external_name)));

        match &symbol.shape {
            SymbolShape::Function { is_async, params } => {
                let title = format!("{}()", symbol.external_name);
                call_test(w, scope, &title, local, *is_async, params);
            }
            SymbolShape::Class {
                constructor_params,
                methods,
            } => {
                let mut scope = scope.clone();
                let args = placeholder_args(w, &mut scope, constructor_params);
                let instance = scope.alloc("instance");
                w.line(format!("const {} = new {}({});", instance, local, args));

                if methods.is_empty() {
                    w.blank();
                    w.open("test('creates an instance', () => {");
                    w.line(format!(
                        "expect({}).toBeInstanceOf({}); // TODO: assert on the instance state",
                        instance, local
                    ));
                    w.close("});");
                }

                for method in methods {
                    w.blank();
                    let (title, callee) = if method.is_static {
                        (
                            format!("static {}()", method.name),
                            member_access(local, &method.name),
                        )
                    } else {
                        (
                            format!("{}()", method.name),
                            member_access(&instance, &method.name),
                        )
                    };
                    call_test(w, &scope, &title, &callee, method.is_async, &method.params);
                }
            }
            SymbolShape::Variable => {
                defined_test(w, local, "TODO: replace with a meaningful assertion");
            }
            SymbolShape::Unknown => {
                let note = format!(
                    "TODO: `{}` could not be classified; write this test by hand",
                    symbol.external_name
                );
                defined_test(w, local, &note);
            }
        }

        w.close("});");
    }
}

/// One test calling `callee` with placeholder arguments.
fn call_test(
    w: &mut CodeWriter,
    scope: &Bindings,
    title: &str,
    callee: &str,
    is_async: bool,
    params: &[Param],
) {
    let mut scope = scope.clone();
    let header = if is_async {
        format!("test({}, async () => {{", quote(title))
    } else {
        format!("test({}, () => {{", quote(title))
    };
    w.open(header);

    let args = placeholder_args(w, &mut scope, params);
    let result = scope.alloc("result");
    let call = format!("{}({})", callee, args);
    if is_async {
        w.line(format!("const {} = await {};", result, call));
    } else {
        w.line(format!("const {} = {};", result, call));
    }
    w.line(format!(
        "expect({}).toEqual(undefined); // TODO: assert the expected value",
        result
    ));

    w.close("});");
}

/// The generic "value is defined" test.
fn defined_test(w: &mut CodeWriter, local: &str, note: &str) {
    w.open("test('is defined', () => {");
    w.line(format!("// {}", note));
    w.line(format!("expect({}).toBeDefined();", local));
    w.close("});");
}

/// Declare one placeholder per parameter and return the argument list.
fn placeholder_args(w: &mut CodeWriter, scope: &mut Bindings, params: &[Param]) -> String {
    params
        .iter()
        .map(|param| {
            let local = scope.alloc(&param.name);
            if param.rest {
                w.line(format!("const {} = []; // TODO: provide values", local));
                format!("...{}", local)
            } else {
                w.line(format!("const {} = undefined; // TODO: provide a value", local));
                local
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Local bindings for every export and the import statement binding them.
struct ImportPlan {
    /// Local binding per symbol, parallel to the symbol list.
    locals: Vec<String>,
    default_local: Option<String>,
    specifiers: Vec<String>,
    /// Module-level names; test locals must not shadow them.
    scope: Bindings,
}

impl ImportPlan {
    fn new(symbols: &[ExportSymbol]) -> Self {
        let mut scope = Bindings::new();
        // Names usable as-is claim themselves before anything is suffixed
        for symbol in symbols {
            if !symbol.is_default && is_binding_name(&symbol.external_name) {
                scope.reserve(&symbol.external_name);
            }
        }

        let mut plan = ImportPlan {
            locals: Vec::with_capacity(symbols.len()),
            default_local: None,
            specifiers: Vec::new(),
            scope,
        };

        for symbol in symbols {
            let name = &symbol.external_name;
            let local = if symbol.is_default {
                let local = plan.scope.alloc(DEFAULT_BINDING);
                plan.default_local = Some(local.clone());
                local
            } else if is_binding_name(name) {
                plan.specifiers.push(name.clone());
                name.clone()
            } else {
                let local = plan.scope.alloc(name);
                let imported = if is_identifier_name(name) {
                    name.clone()
                } else {
                    quote(name)
                };
                plan.specifiers.push(format!("{} as {}", imported, local));
                local
            };
            plan.locals.push(local);
        }

        plan
    }

    fn statement(&self, module_path: &str) -> String {
        let mut clauses = Vec::new();
        if let Some(default) = &self.default_local {
            clauses.push(default.clone());
        }
        if !self.specifiers.is_empty() {
            clauses.push(format!("{{ {} }}", self.specifiers.join(", ")));
        }
        format!("import {} from {};", clauses.join(", "), quote(module_path))
    }
}
