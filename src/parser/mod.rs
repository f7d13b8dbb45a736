//! Module parser: source text to a structural view of the top level.
//!
//! This module provides:
//! - `Dialect`: which tree-sitter grammar reads the text
//! - `ModuleParser`: a reusable (warm) parser for one dialect
//! - `ParsedModule`: declarations, export statements and import bindings
//!
//! Parsing is pure: the same text always produces the same `ParsedModule`
//! or the same `ParseError` diagnostic.

pub mod ast;
mod lower;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tree_sitter::{Language, Parser as TsParser};

use crate::diagnostic::{Diagnostic, Position};
use ast::{Declaration, ExportStatement};
use lower::Lowerer;

/// Source dialect, selecting the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    TypeScript,
    Tsx,
    JavaScript,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
            Dialect::JavaScript => "javascript",
        }
    }

    /// The tree-sitter grammar for this dialect.
    pub fn language(&self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Pick a dialect from a file extension (without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            "js" | "mjs" | "cjs" | "jsx" => Some(Dialect::JavaScript),
            _ => None,
        }
    }

    /// File extensions this dialect handles.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Dialect::TypeScript => &["ts", "mts", "cts"],
            Dialect::Tsx => &["tsx"],
            Dialect::JavaScript => &["js", "mjs", "cjs", "jsx"],
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typescript" | "ts" => Ok(Dialect::TypeScript),
            "tsx" => Ok(Dialect::Tsx),
            "javascript" | "js" => Ok(Dialect::JavaScript),
            _ => anyhow::bail!(
                "invalid dialect {:?}, must be 'typescript', 'tsx', or 'javascript'",
                s
            ),
        }
    }
}

/// Whether the text uses ES module syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxKind {
    /// No top-level `import` or `export`.
    Script,
    Module,
}

/// The module text being analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    text: String,
    dialect: Dialect,
    syntax: SyntaxKind,
}

impl SourceModule {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn syntax(&self) -> SyntaxKind {
        self.syntax
    }
}

/// Structural view of a parsed module.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub source: SourceModule,
    /// Top-level declarations in source order, including exported ones.
    pub declarations: Vec<Declaration>,
    /// Export statements in source order.
    pub exports: Vec<ExportStatement>,
    /// Local names bound by top-level imports.
    pub imports: Vec<String>,
}

impl ParsedModule {
    /// Find the top-level declaration of `name`.
    ///
    /// Overload signatures yield to the implementing declaration.
    pub fn find_declaration(&self, name: &str) -> Option<&Declaration> {
        let mut found: Option<&Declaration> = None;
        for decl in self.declarations.iter().filter(|d| d.name == name) {
            match found {
                Some(prev) if !matches!(prev.form, ast::DeclForm::Signature(_)) => break,
                _ => found = Some(decl),
            }
        }
        found
    }

    /// Whether `name` is bound by an import statement.
    pub fn is_imported(&self, name: &str) -> bool {
        self.imports.iter().any(|i| i == name)
    }
}

/// Reusable parser for one dialect.
///
/// The underlying tree-sitter parser keeps no per-request state between
/// calls, so one instance can serve many requests in sequence.
pub struct ModuleParser {
    parser: TsParser,
    dialect: Dialect,
}

impl ModuleParser {
    /// Create a parser for the given dialect.
    pub fn new(dialect: Dialect) -> anyhow::Result<Self> {
        let mut parser = TsParser::new();
        parser.set_language(&dialect.language())?;
        Ok(Self { parser, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse module text.
    ///
    /// Fails with a `ParseError` diagnostic positioned at the first syntax
    /// error. Empty text is a valid (script) module.
    pub fn parse(&mut self, text: &str) -> Result<ParsedModule, Diagnostic> {
        self.parser.reset();
        let tree = self.parser.parse(text, None).ok_or_else(|| {
            Diagnostic::parse_error("parser produced no syntax tree", Position::new(1, 1))
        })?;

        let root = tree.root_node();
        let lowerer = Lowerer::new(text.as_bytes());
        if root.has_error() {
            return Err(lowerer.syntax_error(root));
        }

        let program = lowerer.program(root);
        let syntax = if program.has_module_syntax {
            SyntaxKind::Module
        } else {
            SyntaxKind::Script
        };

        log::debug!(
            "parsed {} module: {} declarations, {} export statements",
            self.dialect,
            program.declarations.len(),
            program.exports.len()
        );

        Ok(ParsedModule {
            source: SourceModule {
                text: text.to_string(),
                dialect: self.dialect,
                syntax,
            },
            declarations: program.declarations,
            exports: program.exports,
            imports: program.imports,
        })
    }
}

/// Parse module text with a fresh parser.
pub fn parse(text: &str, dialect: Dialect) -> Result<ParsedModule, Diagnostic> {
    let mut parser = ModuleParser::new(dialect).map_err(|e| {
        Diagnostic::parse_error(format!("failed to load {} grammar: {}", dialect, e), Position::new(1, 1))
    })?;
    parser.parse(text)
}
