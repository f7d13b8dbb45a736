//! Output formatting for zubora results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::analysis::{ExportKind, ExportSymbol};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::engine::{ExportListing, RenderedTemplate};

/// Export analysis of one input file.
pub struct FileExports {
    pub path: String,
    pub result: Result<ExportListing, Diagnostic>,
}

/// Scaffold generated for one input file.
pub struct FileTemplate {
    pub path: String,
    /// Where the scaffold was written, if not stdout.
    pub output: Option<String>,
    pub result: Result<RenderedTemplate, Diagnostic>,
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
pub struct JsonExportsReport<'a> {
    pub version: &'static str,
    pub files: Vec<JsonFileExports<'a>>,
}

#[derive(Serialize)]
pub struct JsonFileExports<'a> {
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    pub exports: &'a [ExportSymbol],
    #[serde(skip_serializing_if = "no_warnings")]
    pub warnings: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a Diagnostic>,
}

#[derive(Serialize)]
pub struct JsonGenerateReport<'a> {
    pub version: &'static str,
    pub files: Vec<JsonFileTemplate<'a>>,
}

#[derive(Serialize)]
pub struct JsonFileTemplate<'a> {
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'a RenderedTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a Diagnostic>,
}

fn no_warnings(warnings: &&[Diagnostic]) -> bool {
    warnings.is_empty()
}

/// Render export listings as JSON.
pub fn exports_json(files: &[FileExports]) -> anyhow::Result<String> {
    let report = JsonExportsReport {
        version: env!("CARGO_PKG_VERSION"),
        files: files
            .iter()
            .map(|f| match &f.result {
                Ok(listing) => JsonFileExports {
                    path: &f.path,
                    dialect: Some(listing.dialect.to_string()),
                    exports: &listing.symbols,
                    warnings: &listing.warnings,
                    error: None,
                },
                Err(diag) => JsonFileExports {
                    path: &f.path,
                    dialect: None,
                    exports: &[],
                    warnings: &[],
                    error: Some(diag),
                },
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render generation results as JSON.
pub fn generate_json(files: &[FileTemplate]) -> anyhow::Result<String> {
    let report = JsonGenerateReport {
        version: env!("CARGO_PKG_VERSION"),
        files: files
            .iter()
            .map(|f| JsonFileTemplate {
                path: &f.path,
                output: f.output.as_deref(),
                template: f.result.as_ref().ok(),
                error: f.result.as_ref().err(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn write_exports_json(files: &[FileExports]) -> anyhow::Result<()> {
    println!("{}", exports_json(files)?);
    Ok(())
}

pub fn write_generate_json(files: &[FileTemplate]) -> anyhow::Result<()> {
    println!("{}", generate_json(files)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// `path:line:column: kind: message` for one diagnostic.
pub fn diagnostic_line(path: &str, diag: &Diagnostic) -> String {
    match diag.position {
        Some(pos) => format!("{}:{}: {}: {}", path, pos, diag.kind, diag.message),
        None => format!("{}: {}: {}", path, diag.kind, diag.message),
    }
}

/// Print a diagnostic to stderr.
pub fn print_diagnostic(path: &str, diag: &Diagnostic) {
    let line = diagnostic_line(path, diag);
    match diag.kind {
        DiagnosticKind::ParseError => eprintln!("{} {}", "error:".red().bold(), line),
        DiagnosticKind::UnsupportedExport => eprintln!("{} {}", "warning:".yellow(), line),
    }
}

/// Write export listings in pretty format.
pub fn write_exports_pretty(files: &[FileExports]) {
    println!();
    print!("  ");
    print!("{}", "zubora".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    for file in files {
        print!("  {}", file.path.blue());
        match &file.result {
            Ok(listing) => {
                println!(" {}", format!("({})", listing.dialect).dimmed());
                if listing.symbols.is_empty() {
                    println!("    {}", "no exports".dimmed());
                }
                for symbol in &listing.symbols {
                    write_symbol(symbol);
                }
                for warning in &listing.warnings {
                    write_warning(warning);
                }
            }
            Err(diag) => {
                println!();
                write_error(diag);
            }
        }
        println!();
    }

    write_exports_summary(files);
    println!();
}

fn write_symbol(symbol: &ExportSymbol) {
    write_kind_tag(symbol.kind());
    print!(" {}", symbol.external_name.bold());
    if symbol.is_renamed() || (symbol.is_default && symbol.internal_name != symbol.external_name) {
        print!(" {}", format!("<- {}", symbol.internal_name).dimmed());
    }
    if symbol.is_async() {
        print!(" {}", "async".magenta());
    }
    println!("{}", format!(":{}", symbol.line).dimmed());

    for method in symbol.methods() {
        print!("          ");
        if method.is_static {
            print!("{} ", "static".dimmed());
        }
        if method.is_async {
            print!("{} ", "async".magenta());
        }
        println!("{}()", method.name);
    }
}

fn write_kind_tag(kind: ExportKind) {
    match kind {
        ExportKind::Function => print!("    {}", "fn     ".green()),
        ExportKind::Class => print!("    {}", "class  ".cyan()),
        ExportKind::Variable => print!("    {}", "var    ".blue()),
        ExportKind::Unknown => print!("    {}", "unknown".yellow()),
    }
}

fn write_warning(diag: &Diagnostic) {
    print!("    {} ", "WARN ".yellow());
    if let Some(pos) = diag.position {
        print!("{} ", pos.to_string().dimmed());
    }
    println!("{}", diag.message);
}

fn write_error(diag: &Diagnostic) {
    print!("    {} ", "ERROR".red());
    if let Some(pos) = diag.position {
        print!("{} ", pos.to_string().dimmed());
    }
    println!("{}", diag.message);
}

fn write_exports_summary(files: &[FileExports]) {
    let exports: usize = files
        .iter()
        .filter_map(|f| f.result.as_ref().ok())
        .map(|l| l.symbols.len())
        .sum();
    let failed = files.iter().filter(|f| f.result.is_err()).count();

    print!("  {} export{} in {} file{}", exports, plural(exports), files.len(), plural(files.len()));
    if failed > 0 {
        print!("  {}", format!("{} failed to parse", failed).red());
    }
    println!();
}

/// Summarize a directory generation run.
pub fn write_generate_summary(files: &[FileTemplate]) {
    println!();
    for file in files {
        match &file.result {
            Ok(template) => {
                print!("  {} ", "✓".green());
                print!("{}", file.output.as_deref().unwrap_or(&file.path).blue());
                print!(
                    " {}",
                    format!("({} block{})", template.blocks, plural(template.blocks)).dimmed()
                );
                if !template.warnings.is_empty() {
                    print!(
                        " {}",
                        format!("{} warning{}", template.warnings.len(), plural(template.warnings.len()))
                            .yellow()
                    );
                }
                println!();
            }
            Err(diag) => {
                println!("  {} {}", "✗".red(), diagnostic_line(&file.path, diag));
            }
        }
    }
    println!();

    let written = files.iter().filter(|f| f.result.is_ok()).count();
    let failed = files.len() - written;
    print!("  Generated {} scaffold{}", written, plural(written));
    if failed > 0 {
        print!("  {}", format!("{} failed", failed).red());
    }
    println!();
}

fn plural(n: usize) -> &'static str {
    if n != 1 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Position;
    use crate::engine::Analyzer;
    use crate::parser::Dialect;

    #[test]
    fn test_diagnostic_line() {
        let diag = Diagnostic::parse_error("unexpected `}`", Position::new(2, 5));
        assert_eq!(
            diagnostic_line("src/a.ts", &diag),
            "src/a.ts:2:5: parse error: unexpected `}`"
        );
        let diag = Diagnostic::unsupported_export("re-export", None);
        assert_eq!(diagnostic_line("a.ts", &diag), "a.ts: unsupported export: re-export");
    }

    #[test]
    fn test_exports_json() {
        let mut analyzer = Analyzer::new();
        let files = vec![
            FileExports {
                path: "a.ts".to_string(),
                result: analyzer.analyze_exports("export async function load() {}", Dialect::TypeScript),
            },
            FileExports {
                path: "b.ts".to_string(),
                result: analyzer.analyze_exports("export {", Dialect::TypeScript),
            },
        ];
        let json: serde_json::Value = serde_json::from_str(&exports_json(&files).unwrap()).unwrap();

        let a = &json["files"][0];
        assert_eq!(a["dialect"], "typescript");
        assert_eq!(a["exports"][0]["external_name"], "load");
        assert_eq!(a["exports"][0]["kind"], "function");
        assert_eq!(a["exports"][0]["is_async"], true);
        assert!(a.get("error").is_none());

        let b = &json["files"][1];
        assert_eq!(b["error"]["kind"], "parse_error");
        assert!(b["error"]["position"]["line"].is_number());
    }

    #[test]
    fn test_generate_json() {
        let files = vec![FileTemplate {
            path: "a.ts".to_string(),
            output: Some("a.test.ts".to_string()),
            result: Analyzer::new().analyze("export const a = 1;"),
        }];
        let json: serde_json::Value = serde_json::from_str(&generate_json(&files).unwrap()).unwrap();
        assert_eq!(json["files"][0]["output"], "a.test.ts");
        assert_eq!(json["files"][0]["template"]["blocks"], 1);
        assert!(json["files"][0]["template"]["text"]
            .as_str()
            .unwrap()
            .contains("describe('a'"));
    }
}
