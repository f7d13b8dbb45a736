//! Analysis orchestrator.
//!
//! Drives parser, classifier and synthesizer for one request. A parse
//! failure is the only fatal outcome; everything after a successful parse
//! degrades per symbol and still renders.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::{classify, Classification, ExportSymbol};
use crate::diagnostic::{Diagnostic, Position};
use crate::parser::{Dialect, ModuleParser, ParsedModule};
use crate::synth::{Synthesizer, TemplateOptions};

/// Rendered test scaffold for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTemplate {
    pub text: String,
    /// Top-level stub blocks, one per export symbol.
    pub blocks: usize,
    /// Non-fatal `UnsupportedExport` diagnostics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

/// Classified exports of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportListing {
    pub dialect: Dialect,
    pub symbols: Vec<ExportSymbol>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

/// Reusable analysis pipeline.
///
/// Keeps one warm parser per dialect it has seen. Parsers hold no state
/// between requests, so results never depend on what was analyzed before.
pub struct Analyzer {
    dialect: Dialect,
    parsers: HashMap<Dialect, ModuleParser>,
    synth: Synthesizer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// TypeScript analyzer with default template options.
    pub fn new() -> Self {
        Self::with_options(Dialect::default(), TemplateOptions::default())
    }

    pub fn with_options(dialect: Dialect, options: TemplateOptions) -> Self {
        Self {
            dialect,
            parsers: HashMap::new(),
            synth: Synthesizer::new(options),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn options(&self) -> &TemplateOptions {
        self.synth.options()
    }

    /// Replace the template options, keeping the warm parsers.
    pub fn set_options(&mut self, options: TemplateOptions) {
        self.synth = Synthesizer::new(options);
    }

    /// Analyze module text in the default dialect.
    pub fn analyze(&mut self, source: &str) -> Result<RenderedTemplate, Diagnostic> {
        self.analyze_as(source, self.dialect)
    }

    /// Analyze module text in an explicit dialect.
    pub fn analyze_as(
        &mut self,
        source: &str,
        dialect: Dialect,
    ) -> Result<RenderedTemplate, Diagnostic> {
        let module = self.parse(source, dialect)?;
        let Classification { symbols, warnings } = classify(&module);
        let text = self.synth.render(&symbols);

        Ok(RenderedTemplate {
            text,
            blocks: symbols.len(),
            warnings,
        })
    }

    /// Classify exports without rendering.
    pub fn analyze_exports(
        &mut self,
        source: &str,
        dialect: Dialect,
    ) -> Result<ExportListing, Diagnostic> {
        let module = self.parse(source, dialect)?;
        let Classification { symbols, warnings } = classify(&module);
        Ok(ExportListing {
            dialect,
            symbols,
            warnings,
        })
    }

    fn parse(&mut self, source: &str, dialect: Dialect) -> Result<ParsedModule, Diagnostic> {
        if !self.parsers.contains_key(&dialect) {
            let parser = ModuleParser::new(dialect).map_err(|e| {
                Diagnostic::parse_error(
                    format!("failed to load {} grammar: {}", dialect, e),
                    Position::new(1, 1),
                )
            })?;
            self.parsers.insert(dialect, parser);
        }
        match self.parsers.get_mut(&dialect) {
            Some(parser) => parser.parse(source),
            None => Err(Diagnostic::parse_error(
                format!("no {} parser available", dialect),
                Position::new(1, 1),
            )),
        }
    }
}

/// Analyze TypeScript module text with default options.
pub fn analyze(source: &str) -> Result<RenderedTemplate, Diagnostic> {
    Analyzer::new().analyze(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::synth::NO_EXPORTS_MARKER;

    const SCENARIO: &str = r#"
export class iAmClass {
    constructor(name) {
        this.name = name;
    }

    async myAsync() {
        return this.name;
    }

    myMethod() {
        return 1;
    }
}

function iWillBeRenamed() {
    return 2;
}

export { iWillBeRenamed as iAmRenamed };

export default async function iAmDefaultAndAsync() {
    return 3;
}
"#;

    #[test]
    fn test_scenario_blocks_in_order() {
        let template = analyze(SCENARIO).unwrap();
        assert_eq!(template.blocks, 3);
        assert!(template.warnings.is_empty());

        let text = &template.text;
        let class = text.find("describe('iAmClass'").expect("class block");
        let renamed = text.find("describe('iAmRenamed'").expect("renamed block");
        let default = text.find("describe('default'").expect("default block");
        assert!(class < renamed && renamed < default);

        assert!(text.contains("const result = await instance.myAsync();"));
        assert!(text.contains("const result = instance.myMethod();"));
        assert!(text.contains("const result = iAmRenamed();"));
        assert!(text.contains("const result = await defaultExport();"));
        assert!(!text.contains("iWillBeRenamed"));
        assert!(!text.contains("constructor()"));
    }

    #[test]
    fn test_idempotent() {
        let mut analyzer = Analyzer::new();
        let first = analyzer.analyze(SCENARIO).unwrap();
        analyzer.analyze("export const other = 1;").unwrap();
        let second = analyzer.analyze(SCENARIO).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, analyze(SCENARIO).unwrap());
    }

    #[test]
    fn test_empty_source() {
        let template = analyze("").unwrap();
        assert_eq!(template.blocks, 0);
        assert_eq!(template.text, format!("{}\n", NO_EXPORTS_MARKER));
    }

    #[test]
    fn test_malformed_source() {
        let diag = analyze("export function (").unwrap_err();
        assert_eq!(diag.kind, DiagnosticKind::ParseError);
        assert!(diag.position.is_some());
    }

    #[test]
    fn test_unclassifiable_export_degrades() {
        let template = analyze("export interface Shape { area(): number }\nexport const n = 1;").unwrap();
        assert_eq!(template.blocks, 2);
        assert_eq!(template.warnings.len(), 1);
        assert_eq!(template.warnings[0].kind, DiagnosticKind::UnsupportedExport);
        assert_eq!(template.text.matches("could not be classified").count(), 1);
    }

    #[test]
    fn test_import_alias_gets_a_block() {
        let template = analyze("namespace B { export const c = 1; }\nexport import A = B.c;\n").unwrap();
        assert_eq!(template.blocks, 1);
        assert_eq!(template.warnings.len(), 1);
        assert!(template.text.contains("describe('A'"));
    }

    #[test]
    fn test_deeply_nested_default_export() {
        let depth = 10_000;
        let source = format!("export default {}x{};\n", "(".repeat(depth), ")".repeat(depth));
        let template = analyze(&source).unwrap();
        assert_eq!(template.blocks, 1);
    }

    #[test]
    fn test_duplicate_aliases_render_separately() {
        let template = analyze("function f() {}\nexport { f as a, f as b };").unwrap();
        assert_eq!(template.blocks, 2);
        assert!(template.text.contains("describe('a'"));
        assert!(template.text.contains("describe('b'"));
    }

    #[test]
    fn test_javascript_dialect() {
        let mut analyzer = Analyzer::new();
        let listing = analyzer
            .analyze_exports("export async function load(url) {}", Dialect::JavaScript)
            .unwrap();
        assert_eq!(listing.symbols.len(), 1);
        assert!(listing.symbols[0].is_async());
    }
}
