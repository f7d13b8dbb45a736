//! Lowering of a tree-sitter syntax tree into the structural module form.
//!
//! The TypeScript, TSX and JavaScript grammars share node names for
//! everything handled here. Where they differ (`field_definition` vs
//! `public_field_definition`, `function` vs `function_expression`) both
//! spellings are accepted.

use tree_sitter::Node;

use super::ast::{
    ClassMember, ClassShape, DeclForm, Declaration, DefaultExport, ExportItem, ExportSpecifier,
    ExportStatement, Expr, FunctionShape, MemberKind, Param, Visibility,
};
use crate::diagnostic::{Diagnostic, Position};

/// Maximum length of a source snippet quoted in a parse error.
const SNIPPET_LEN: usize = 24;

/// Top-level items collected from a program node.
#[derive(Debug, Default)]
pub(super) struct Program {
    pub declarations: Vec<Declaration>,
    pub exports: Vec<ExportStatement>,
    pub imports: Vec<String>,
    pub has_module_syntax: bool,
}

/// Walks syntax nodes with access to the source text.
pub(super) struct Lowerer<'a> {
    source: &'a [u8],
}

impl<'a> Lowerer<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self { source }
    }

    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Lower every top-level statement of a `program` node.
    pub fn program(&self, root: Node) -> Program {
        let mut program = Program::default();
        let mut cursor = root.walk();

        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "export_statement" => {
                    program.has_module_syntax = true;
                    let stmt = self.export_statement(child);
                    match &stmt.item {
                        ExportItem::Declarations(decls) => {
                            program.declarations.extend(decls.iter().cloned());
                        }
                        ExportItem::Default(DefaultExport::Declaration(decl)) => {
                            program.declarations.push(decl.clone());
                        }
                        _ => {}
                    }
                    program.exports.push(stmt);
                }
                "import_statement" => {
                    program.has_module_syntax = true;
                    program.imports.extend(self.import_bindings(child));
                }
                // `namespace Foo {}` parses as an expression statement
                "expression_statement" => {
                    if let Some(inner) = child.named_child(0) {
                        program.declarations.extend(self.declarations(inner));
                    }
                }
                _ => program.declarations.extend(self.declarations(child)),
            }
        }

        program
    }

    /// Declarations introduced by a declaration node. Most nodes declare
    /// one name; variable declarations may declare several.
    pub fn declarations(&self, node: Node) -> Vec<Declaration> {
        let line = node.start_position().row + 1;
        let named = |form: DeclForm| -> Vec<Declaration> {
            match node.child_by_field_name("name") {
                Some(name) => vec![Declaration {
                    name: self.text(name).to_string(),
                    form,
                    line,
                }],
                None => Vec::new(),
            }
        };

        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                named(DeclForm::Function(self.function_shape(node)))
            }
            "function_signature" => named(DeclForm::Signature(self.function_shape(node))),
            "class_declaration" | "abstract_class_declaration" => {
                named(DeclForm::Class(self.class_shape(node)))
            }
            "lexical_declaration" | "variable_declaration" => self.variable_declarations(node),
            "enum_declaration" => named(DeclForm::Enum),
            "import_alias" => {
                // `import A = B.c`: alias first, then the entity name
                let mut cursor = node.walk();
                let mut names = node.named_children(&mut cursor);
                match (names.next(), names.next()) {
                    (Some(alias), Some(target)) => vec![Declaration {
                        name: self.text(alias).to_string(),
                        form: DeclForm::ImportAlias {
                            target: self.text(target).to_string(),
                        },
                        line,
                    }],
                    _ => Vec::new(),
                }
            }
            "interface_declaration" | "type_alias_declaration" => named(DeclForm::TypeOnly),
            "module" | "internal_module" => {
                // `declare module 'pkg'` describes another module, not a binding
                match node.child_by_field_name("name") {
                    Some(name) if name.kind() != "string" => named(DeclForm::Namespace),
                    _ => Vec::new(),
                }
            }
            "ambient_declaration" => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .flat_map(|child| self.declarations(child))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn variable_declarations(&self, node: Node) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        let mut cursor = node.walk();

        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let line = declarator.start_position().row + 1;

            if name.kind() == "identifier" {
                let init = declarator
                    .child_by_field_name("value")
                    .map(|value| self.expr(value));
                declarations.push(Declaration {
                    name: self.text(name).to_string(),
                    form: DeclForm::Variable { init },
                    line,
                });
            } else {
                // Destructuring binds every identifier in the pattern
                let names = self.pattern_bindings(name);
                declarations.extend(names.into_iter().map(|name| Declaration {
                    name,
                    form: DeclForm::Variable { init: None },
                    line,
                }));
            }
        }

        declarations
    }

    /// Identifiers bound by a destructuring pattern, in source order.
    fn pattern_bindings(&self, pattern: Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut stack = vec![pattern];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "identifier" | "shorthand_property_identifier_pattern" => {
                    names.push(self.text(node).to_string());
                }
                "pair_pattern" => stack.extend(node.child_by_field_name("value")),
                "assignment_pattern" | "object_assignment_pattern" => {
                    stack.extend(node.child_by_field_name("left"))
                }
                _ => {
                    let mut cursor = node.walk();
                    let children: Vec<Node> = node.named_children(&mut cursor).collect();
                    stack.extend(children.into_iter().rev());
                }
            }
        }

        names
    }

    /// Shape of any function-like node: declarations, expressions, arrows
    /// and method definitions.
    pub fn function_shape(&self, node: Node) -> FunctionShape {
        let params = if let Some(params) = node.child_by_field_name("parameters") {
            self.params(params)
        } else if let Some(param) = node.child_by_field_name("parameter") {
            // `x => x`
            vec![Param::new(self.text(param))]
        } else {
            Vec::new()
        };

        FunctionShape {
            is_async: has_token(node, "async"),
            params,
        }
    }

    fn params(&self, node: Node) -> Vec<Param> {
        let mut params = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            let index = params.len();
            let param = match child.kind() {
                "comment" | "decorator" => continue,
                "required_parameter" | "optional_parameter" => child
                    .child_by_field_name("pattern")
                    .and_then(|pattern| self.param(pattern, index)),
                _ => self.param(child, index),
            };
            if let Some(param) = param {
                params.push(param);
            }
        }

        params
    }

    fn param(&self, pattern: Node, index: usize) -> Option<Param> {
        match pattern.kind() {
            "identifier" => Some(Param::new(self.text(pattern))),
            "this" => None,
            "assignment_pattern" => pattern
                .child_by_field_name("left")
                .and_then(|left| self.param(left, index)),
            "rest_pattern" => {
                let inner = pattern.named_child(0)?;
                let mut param = self.param(inner, index)?;
                param.rest = true;
                Some(param)
            }
            _ => Some(Param::new(format!("arg{}", index))),
        }
    }

    pub fn class_shape(&self, node: Node) -> ClassShape {
        let mut shape = ClassShape::default();

        let Some(body) = node.child_by_field_name("body") else {
            return shape;
        };

        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            let member = match child.kind() {
                "method_definition" => self.method(child),
                "public_field_definition" | "field_definition" => self.callable_field(child),
                _ => None,
            };
            if let Some(member) = member {
                shape.members.push(member);
            }
        }

        shape
    }

    fn method(&self, node: Node) -> Option<ClassMember> {
        let name_node = node.child_by_field_name("name")?;
        let (name, is_computed) = self.member_name(name_node);
        let is_static = has_token(node, "static");

        let kind = if has_token(node, "get") {
            MemberKind::Getter
        } else if has_token(node, "set") {
            MemberKind::Setter
        } else if name == "constructor" && !is_static {
            MemberKind::Constructor
        } else {
            MemberKind::Method
        };

        Some(ClassMember {
            name,
            kind,
            visibility: self.visibility(node, name_node),
            is_static,
            is_computed,
            function: self.function_shape(node),
        })
    }

    fn callable_field(&self, node: Node) -> Option<ClassMember> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("property"))?;
        let value = node.child_by_field_name("value")?;
        if !matches!(
            value.kind(),
            "arrow_function" | "function_expression" | "function" | "generator_function"
        ) {
            return None;
        }

        let (name, is_computed) = self.member_name(name_node);
        Some(ClassMember {
            name,
            kind: MemberKind::CallableField,
            visibility: self.visibility(node, name_node),
            is_static: has_token(node, "static"),
            is_computed,
            function: self.function_shape(value),
        })
    }

    fn member_name(&self, name_node: Node) -> (String, bool) {
        match name_node.kind() {
            "computed_property_name" => (self.text(name_node).to_string(), true),
            "string" => (unquote(self.text(name_node)).to_string(), false),
            _ => (self.text(name_node).to_string(), false),
        }
    }

    fn visibility(&self, member: Node, name_node: Node) -> Visibility {
        if name_node.kind() == "private_property_identifier" {
            return Visibility::Hidden;
        }
        let mut cursor = member.walk();
        let hidden = member.children(&mut cursor).any(|child| {
            child.kind() == "accessibility_modifier"
                && matches!(self.text(child), "private" | "protected")
        });
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Public
        }
    }

    /// Reduce an expression to its classification-relevant shape.
    pub fn expr(&self, node: Node) -> Expr {
        let mut node = node;
        // Wrappers nest without bound, so peel them iteratively
        loop {
            let inner = match node.kind() {
                "parenthesized_expression" | "as_expression" | "satisfies_expression"
                | "non_null_expression" => node.named_child(0),
                // `<T>value`: the expression follows the type
                "type_assertion" => node.named_child(node.named_child_count().saturating_sub(1)),
                _ => break,
            };
            match inner {
                Some(inner) => node = inner,
                None => return Expr::Other(node.kind().to_string()),
            }
        }

        match node.kind() {
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                Expr::Function(self.function_shape(node))
            }
            "class" => Expr::Class(self.class_shape(node)),
            "identifier" => Expr::Identifier(self.text(node).to_string()),
            "object" | "array" | "string" | "template_string" | "number" | "true" | "false"
            | "null" | "undefined" | "regex" | "new_expression" => Expr::Value,
            other => Expr::Other(other.to_string()),
        }
    }

    pub fn export_statement(&self, node: Node) -> ExportStatement {
        let start = node.start_position();
        ExportStatement {
            item: self.export_item(node),
            line: start.row + 1,
            column: start.column + 1,
        }
    }

    fn export_item(&self, node: Node) -> ExportItem {
        let source = node
            .child_by_field_name("source")
            .map(|s| unquote(self.text(s)).to_string());
        let is_default = has_token(node, "default");

        if let Some(decl) = node.child_by_field_name("declaration") {
            let mut decls = self.declarations(decl);
            if is_default {
                let default = if decls.is_empty() {
                    DefaultExport::Expression(Expr::Other(decl.kind().to_string()))
                } else {
                    DefaultExport::Declaration(decls.remove(0))
                };
                return ExportItem::Default(default);
            }
            if decls.is_empty() {
                return ExportItem::Unsupported(decl.kind().to_string());
            }
            return ExportItem::Declarations(decls);
        }

        if let Some(value) = node.child_by_field_name("value") {
            // A named function or class expression still declares its name
            if let Some(name) = value.child_by_field_name("name") {
                let form = match self.expr(value) {
                    Expr::Function(shape) => Some(DeclForm::Function(shape)),
                    Expr::Class(shape) => Some(DeclForm::Class(shape)),
                    _ => None,
                };
                if let Some(form) = form {
                    return ExportItem::Default(DefaultExport::Declaration(Declaration {
                        name: self.text(name).to_string(),
                        form,
                        line: value.start_position().row + 1,
                    }));
                }
            }
            return ExportItem::Default(DefaultExport::Expression(self.expr(value)));
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        for (i, child) in children.iter().enumerate() {
            match child.kind() {
                "export_clause" => {
                    return ExportItem::List {
                        specifiers: self.export_specifiers(*child),
                        source,
                    };
                }
                "namespace_export" => {
                    let alias = child
                        .named_child(child.named_child_count().saturating_sub(1))
                        .map(|n| unquote(self.text(n)).to_string());
                    return ExportItem::Namespace {
                        alias,
                        source: source.unwrap_or_default(),
                    };
                }
                "*" if !child.is_named() => {
                    return ExportItem::Namespace {
                        alias: None,
                        source: source.unwrap_or_default(),
                    };
                }
                "=" if !child.is_named() => {
                    let expr = children[i + 1..]
                        .iter()
                        .find(|n| n.is_named() && n.kind() != "comment")
                        .map(|n| self.expr(*n))
                        .unwrap_or_else(|| Expr::Other("export_assignment".to_string()));
                    return ExportItem::Assignment(expr);
                }
                _ => {}
            }
        }

        ExportItem::Unsupported(snippet(self.text(node)))
    }

    fn export_specifiers(&self, clause: Node) -> Vec<ExportSpecifier> {
        let mut specifiers = Vec::new();
        let mut cursor = clause.walk();

        for spec in clause.named_children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let local = unquote(self.text(name)).to_string();
            let exported = spec
                .child_by_field_name("alias")
                .map(|alias| unquote(self.text(alias)).to_string())
                .unwrap_or_else(|| local.clone());
            specifiers.push(ExportSpecifier { local, exported });
        }

        specifiers
    }

    /// Local names bound by an import statement.
    fn import_bindings(&self, node: Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            if child.kind() == "import_clause" {
                self.import_clause_bindings(child, &mut names);
            }
        }

        names
    }

    fn import_clause_bindings(&self, node: Node, out: &mut Vec<String>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => out.push(self.text(child).to_string()),
                "namespace_import" => {
                    if let Some(ident) = child.named_child(0) {
                        out.push(self.text(ident).to_string());
                    }
                }
                "named_imports" => {
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let local = spec
                            .child_by_field_name("alias")
                            .or_else(|| spec.child_by_field_name("name"));
                        if let Some(local) = local {
                            out.push(unquote(self.text(local)).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Build a parse error for the first ERROR or MISSING node.
    pub fn syntax_error(&self, root: Node) -> Diagnostic {
        let Some(node) = first_error(root) else {
            return Diagnostic::parse_error("syntax error", Position::from_point(root.start_position()));
        };
        let token = error_token(node);

        let message = if token.is_missing() {
            format!("missing `{}`", token.kind())
        } else {
            let text = snippet(self.text(token));
            if text.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected `{}`", text)
            }
        };

        Diagnostic::parse_error(message, Position::from_point(token.start_position()))
    }
}

/// First ERROR or MISSING node in document order.
fn first_error(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        // Only subtrees that contain an error are entered
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Narrow an ERROR node to the token the error starts at: the innermost
/// nested error, then its first leaf.
fn error_token(node: Node) -> Node {
    let mut cursor = node.walk();
    while cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.is_missing() || child.has_error() {
                break;
            }
            if !cursor.goto_next_sibling() {
                // No nested error: the leftmost leaf of this node
                cursor.goto_parent();
                while cursor.goto_first_child() {}
                return cursor.node();
            }
        }
    }
    cursor.node()
}

/// Whether `node` has an anonymous keyword/punctuation child of `kind`.
fn has_token(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == kind);
    found
}

/// Strip one layer of matching quotes from a string literal.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// First line of `text`, trimmed and truncated for messages.
fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > SNIPPET_LEN {
        let cut: String = line.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'./module'"), "./module");
        assert_eq!(unquote("\"a-b\""), "a-b");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn test_snippet_truncates_first_line() {
        assert_eq!(snippet("  foo bar  \nbaz"), "foo bar");
        let long = "x".repeat(40);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(SNIPPET_LEN)));
    }
}
