//! Command-line interface for zubora.

use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use walkdir::WalkDir;

use crate::config::{self, Config};
use crate::diagnostic::Diagnostic;
use crate::engine::{Analyzer, RenderedTemplate};
use crate::parser::Dialect;
use crate::report::{self, FileExports, FileTemplate};
use crate::session::Session;
use crate::synth::{TemplateOptions, TestStyle};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Module path used when the source has no file name (stdin).
const STDIN_MODULE_PATH: &str = "./module";

/// Test-scaffold generator for JavaScript and TypeScript modules.
///
/// Zubora reads a module, classifies everything it exports and writes a
/// Jest or Vitest skeleton with one describe block per export.
#[derive(Parser)]
#[command(name = "zubora")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate test scaffolds for a file, a directory, or stdin (`-`)
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),
    /// List the classified exports of a file or directory
    Exports(ExportsArgs),
    /// Analyze JSON-encoded module sources from stdin, one per line
    Serve(ServeArgs),
    /// Create a zubora.yaml from a template
    Init(InitArgs),
}

/// Arguments for the generate command.
#[derive(Parser)]
pub struct GenerateArgs {
    /// File, directory, or `-` for stdin
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the scaffold for a single input here instead of stdout
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Directory mode: write scaffolds under this directory instead of next
    /// to their sources
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Test runner: jest or vitest
    #[arg(short, long)]
    pub style: Option<String>,

    /// Import specifier for the module under test
    #[arg(short, long)]
    pub module_path: Option<String>,

    /// Dialect override: typescript, tsx, or javascript
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Overwrite existing test files in directory mode
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the exports command.
#[derive(Parser)]
pub struct ExportsArgs {
    /// File or directory to analyze
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Dialect override: typescript, tsx, or javascript
    #[arg(short, long)]
    pub dialect: Option<String>,
}

/// Arguments for the serve command.
#[derive(Parser)]
pub struct ServeArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Test runner: jest or vitest
    #[arg(short, long)]
    pub style: Option<String>,

    /// Import specifier for the module under test
    #[arg(short, long)]
    pub module_path: Option<String>,

    /// Dialect of the submitted sources
    #[arg(short, long)]
    pub dialect: Option<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "zubora.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Available config templates.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

/// All available templates.
static TEMPLATES: &[Template] = &[
    Template {
        name: "default",
        description: "TypeScript sources, Jest scaffolds next to each module",
        content: include_str!("templates/default.yaml"),
    },
    Template {
        name: "vitest",
        description: "TypeScript sources, Vitest scaffolds with explicit imports",
        content: include_str!("templates/vitest.yaml"),
    },
    Template {
        name: "javascript",
        description: "Plain JavaScript ES modules, *.spec.js scaffolds",
        content: include_str!("templates/javascript.yaml"),
    },
    Template {
        name: "monorepo",
        description: "Scaffolds importing a package entry point instead of siblings",
        content: include_str!("templates/monorepo.yaml"),
    },
];

/// Command-line overrides layered on top of the config file.
struct Overrides<'a> {
    style: Option<&'a str>,
    module_path: Option<&'a str>,
    dialect: Option<&'a str>,
}

/// Load the config and apply flag overrides, reporting problems the way
/// every command does.
fn resolve_config(path: Option<&Path>, overrides: Overrides<'_>) -> Result<(Config, Option<Dialect>), i32> {
    let mut config = match config::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(EXIT_ERROR);
        }
    };

    if let Some(style) = overrides.style {
        match style.parse::<TestStyle>() {
            Ok(s) => config.style = s,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(EXIT_ERROR);
            }
        }
    }

    if let Some(module_path) = overrides.module_path {
        config.module_path = Some(module_path.to_string());
    }

    let dialect = match overrides.dialect.map(str::parse::<Dialect>) {
        Some(Ok(d)) => Some(d),
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            return Err(EXIT_ERROR);
        }
        None => None,
    };

    Ok((config, dialect))
}

/// Pick the dialect for a source file.
fn dialect_for(path: &Path, forced: Option<Dialect>, fallback: Dialect) -> Dialect {
    forced
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(Dialect::from_extension)
        })
        .unwrap_or(fallback)
}

/// Whether a file name is a source module (not a declaration file).
fn is_source_file(name: &str) -> bool {
    if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Dialect::from_extension)
        .is_some()
}

/// Collect source modules under `root`.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let excludes = config.exclude_set()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() == 0 {
                return true;
            }
            // Skip hidden directories
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            // Skip dependency and existing test directories
            !(e.file_type().is_dir()
                && (name == "node_modules" || name == "__tests__" || name == "__mocks__"))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !is_source_file(name) || config.is_test_file(name) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excludes.is_match(relative) {
            log::debug!("excluded {}", relative.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Relative import specifier from `from_dir` to the module file `target`.
///
/// Both paths must be absolute. The extension is dropped.
pub fn relative_specifier(from_dir: &Path, target: &Path) -> String {
    let target = target.with_extension("");
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = target.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &to[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// `<stem>.<suffix>.<ext>`, next to the source or mirrored under `out_dir`.
pub fn test_path(source: &Path, root: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ts".to_string());
    let name = format!("{}.{}.{}", stem, suffix, ext);

    match out_dir {
        Some(dir) => {
            let parent = source
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .unwrap_or_else(|| Path::new(""));
            dir.join(parent).join(name)
        }
        None => source.with_file_name(name),
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "text" && args.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'text' or 'json'", args.format);
        return Ok(EXIT_ERROR);
    }

    let (config, forced_dialect) = match resolve_config(
        args.config.as_deref(),
        Overrides {
            style: args.style.as_deref(),
            module_path: args.module_path.as_deref(),
            dialect: args.dialect.as_deref(),
        },
    ) {
        Ok(resolved) => resolved,
        Err(code) => return Ok(code),
    };

    if args.path == Path::new("-") {
        return generate_stdin(args, &config, forced_dialect);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    if abs_path.is_dir() {
        generate_dir(args, &config, forced_dialect, &abs_path)
    } else {
        generate_file(args, &config, forced_dialect, &abs_path)
    }
}

fn generate_stdin(args: &GenerateArgs, config: &Config, forced: Option<Dialect>) -> anyhow::Result<i32> {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;

    let dialect = forced.unwrap_or(config.dialect);
    let mut analyzer = Analyzer::with_options(dialect, config.to_options(STDIN_MODULE_PATH));
    let result = analyzer.analyze(&source);
    emit_single(args, "<stdin>", result)
}

fn generate_file(
    args: &GenerateArgs,
    config: &Config,
    forced: Option<Dialect>,
    source_path: &Path,
) -> anyhow::Result<i32> {
    let source = std::fs::read_to_string(source_path)?;
    let dialect = dialect_for(source_path, forced, config.dialect);

    let module_path = match &args.output {
        Some(output) => {
            let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
            let parent = match parent {
                Some(p) => {
                    std::fs::create_dir_all(p)?;
                    p.canonicalize()?
                }
                None => std::env::current_dir()?,
            };
            relative_specifier(&parent, source_path)
        }
        None => match source_path.parent() {
            Some(dir) => relative_specifier(dir, source_path),
            None => STDIN_MODULE_PATH.to_string(),
        },
    };

    let mut analyzer = Analyzer::with_options(dialect, config.to_options(&module_path));
    let result = analyzer.analyze(&source);
    emit_single(args, &args.path.to_string_lossy(), result)
}

/// Print or write the outcome for one input.
fn emit_single(
    args: &GenerateArgs,
    path: &str,
    result: Result<RenderedTemplate, Diagnostic>,
) -> anyhow::Result<i32> {
    let code = if result.is_ok() { EXIT_SUCCESS } else { EXIT_FAILED };

    if let Ok(template) = &result {
        for warning in &template.warnings {
            report::print_diagnostic(path, warning);
        }
        if let Some(output) = &args.output {
            std::fs::write(output, &template.text)?;
            log::info!("wrote {}", output.display());
        }
    }

    if args.format == "json" {
        let file = FileTemplate {
            path: path.to_string(),
            output: args.output.as_ref().map(|o| o.to_string_lossy().to_string()),
            result,
        };
        report::write_generate_json(std::slice::from_ref(&file))?;
        return Ok(code);
    }

    match &result {
        Ok(template) if args.output.is_none() => print!("{}", template.text),
        Ok(_) => {}
        Err(diag) => report::print_diagnostic(path, diag),
    }
    Ok(code)
}

fn generate_dir(
    args: &GenerateArgs,
    config: &Config,
    forced: Option<Dialect>,
    root: &Path,
) -> anyhow::Result<i32> {
    let files = collect_files(root, config)?;
    if files.is_empty() {
        eprintln!("Warning: no source files found");
        return Ok(EXIT_SUCCESS);
    }

    let out_dir = match &args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Some(dir.canonicalize()?)
        }
        None => None,
    };

    // Never clobber hand-written tests unless asked to
    let mut jobs = Vec::with_capacity(files.len());
    for source in files {
        let target = test_path(&source, root, out_dir.as_deref(), &config.test_suffix);
        if target.exists() && !args.force {
            log::info!("skipping {}: {} exists", display_path(&source, root), target.display());
            continue;
        }
        jobs.push((source, target));
    }

    let bar = ProgressBar::new(jobs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<anyhow::Result<FileTemplate>> = jobs
        .par_iter()
        .map_init(Analyzer::new, |analyzer, (source, target)| -> anyhow::Result<FileTemplate> {
            let display = display_path(source, root);
            bar.set_message(display.clone());

            let text = std::fs::read_to_string(source)?;
            let module_path = match target.parent() {
                Some(dir) => relative_specifier(dir, source),
                None => STDIN_MODULE_PATH.to_string(),
            };
            analyzer.set_options(config.to_options(&module_path));
            let result = analyzer.analyze_as(&text, dialect_for(source, forced, config.dialect));

            if let Ok(template) = &result {
                if let Some(dir) = target.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(target, &template.text)?;
            }
            bar.inc(1);

            Ok(FileTemplate {
                path: display,
                output: Some(display_path(target, out_dir.as_deref().unwrap_or(root))),
                result,
            })
        })
        .collect();
    bar.finish_and_clear();

    let files = results.into_iter().collect::<anyhow::Result<Vec<_>>>()?;
    let failed = files.iter().any(|f| f.result.is_err());

    match args.format.as_str() {
        "json" => report::write_generate_json(&files)?,
        _ => report::write_generate_summary(&files),
    }

    if failed {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the exports command.
pub fn run_exports(args: &ExportsArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", args.format);
        return Ok(EXIT_ERROR);
    }

    let (config, forced_dialect) = match resolve_config(
        args.config.as_deref(),
        Overrides {
            style: None,
            module_path: None,
            dialect: args.dialect.as_deref(),
        },
    ) {
        Ok(resolved) => resolved,
        Err(code) => return Ok(code),
    };

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let (root, files) = if abs_path.is_dir() {
        let files = collect_files(&abs_path, &config)?;
        (abs_path.clone(), files)
    } else {
        let root = abs_path.parent().map(Path::to_path_buf).unwrap_or_default();
        (root, vec![abs_path.clone()])
    };

    if files.is_empty() {
        eprintln!("Warning: no source files found");
        return Ok(EXIT_SUCCESS);
    }

    let results: Vec<anyhow::Result<FileExports>> = files
        .par_iter()
        .map_init(Analyzer::new, |analyzer, source| -> anyhow::Result<FileExports> {
            let text = std::fs::read_to_string(source)?;
            let dialect = dialect_for(source, forced_dialect, config.dialect);
            Ok(FileExports {
                path: display_path(source, &root),
                result: analyzer.analyze_exports(&text, dialect),
            })
        })
        .collect();
    let files = results.into_iter().collect::<anyhow::Result<Vec<_>>>()?;
    let failed = files.iter().any(|f| f.result.is_err());

    match args.format.as_str() {
        "json" => report::write_exports_json(&files)?,
        _ => report::write_exports_pretty(&files),
    }

    if failed {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the serve command.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<i32> {
    let (config, forced_dialect) = match resolve_config(
        args.config.as_deref(),
        Overrides {
            style: args.style.as_deref(),
            module_path: args.module_path.as_deref(),
            dialect: args.dialect.as_deref(),
        },
    ) {
        Ok(resolved) => resolved,
        Err(code) => return Ok(code),
    };

    let dialect = forced_dialect.unwrap_or(config.dialect);
    let options = config.to_options(STDIN_MODULE_PATH);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(dialect, options))?;

    Ok(EXIT_SUCCESS)
}

/// Pump stdin requests into a session and stream the latest responses out.
async fn serve(dialect: Dialect, options: TemplateOptions) -> anyhow::Result<()> {
    let mut session = Session::spawn(dialect, options)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut input_open = true;
    let mut pending = false;

    log::info!("serving {} analysis on stdio", dialect);

    while input_open || pending {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match serde_json::from_str::<String>(&line) {
                        Ok(source) => {
                            let seq = session.submit(source)?;
                            log::debug!("submitted request #{}", seq);
                            pending = true;
                        }
                        Err(e) => log::warn!("ignoring request that is not a JSON string: {}", e),
                    },
                    None => input_open = false,
                }
            }
            response = session.recv(), if pending => {
                let Some(response) = response else { break };
                pending = false;
                let json = serde_json::to_string(&response.to_wire())?;
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
    }

    session.dispose();
    Ok(())
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // List mode
    if args.list {
        return list_templates();
    }

    // Find template
    let template = match TEMPLATES.iter().find(|t| t.name == args.template) {
        Some(t) => t,
        None => {
            eprintln!("Error: unknown template {:?}", args.template);
            eprintln!("Run 'zubora init --list' to see available templates");
            return Ok(EXIT_ERROR);
        }
    };

    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    // Write config file
    if let Err(e) = std::fs::write(&args.output, template.content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {} from template '{}'", args.output.display(), template.name);
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: zubora generate src --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

/// List available templates.
fn list_templates() -> anyhow::Result<i32> {
    println!("Available templates:");
    println!();

    for template in TEMPLATES {
        let name = if template.name == "default" {
            format!("{} (default)", template.name)
        } else {
            template.name.to_string()
        };
        println!("  {:<20} {}", name, template.description);
    }

    println!();
    println!("Usage:");
    println!("  zubora init --template <name>");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_valid_configs() {
        for template in TEMPLATES {
            let config = Config::parse_str(template.content)
                .unwrap_or_else(|e| panic!("template {} does not parse: {}", template.name, e));
            assert!(
                config::validate(&config).is_ok(),
                "template {} does not validate",
                template.name
            );
        }
    }

    #[test]
    fn test_relative_specifier() {
        let src = Path::new("/repo/src/widget.ts");
        assert_eq!(relative_specifier(Path::new("/repo/src"), src), "./widget");
        assert_eq!(relative_specifier(Path::new("/repo/tests"), src), "../src/widget");
        assert_eq!(
            relative_specifier(Path::new("/repo/tests/unit"), Path::new("/repo/src/a/b.service.ts")),
            "../../src/a/b.service"
        );
    }

    #[test]
    fn test_test_path() {
        let root = Path::new("/repo/src");
        let source = Path::new("/repo/src/lib/math.ts");
        assert_eq!(
            test_path(source, root, None, "test"),
            PathBuf::from("/repo/src/lib/math.test.ts")
        );
        assert_eq!(
            test_path(source, root, Some(Path::new("/repo/tests")), "spec"),
            PathBuf::from("/repo/tests/lib/math.spec.ts")
        );
    }

    #[test]
    fn test_source_file_filter() {
        assert!(is_source_file("index.ts"));
        assert!(is_source_file("App.tsx"));
        assert!(is_source_file("util.mjs"));
        assert!(!is_source_file("types.d.ts"));
        assert!(!is_source_file("README.md"));
    }

    #[test]
    fn test_dialect_for() {
        assert_eq!(dialect_for(Path::new("a.js"), None, Dialect::TypeScript), Dialect::JavaScript);
        assert_eq!(dialect_for(Path::new("a"), None, Dialect::Tsx), Dialect::Tsx);
        assert_eq!(
            dialect_for(Path::new("a.js"), Some(Dialect::TypeScript), Dialect::Tsx),
            Dialect::TypeScript
        );
    }

    #[test]
    fn test_collect_files_skips_tests_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::create_dir_all(root.join("legacy")).unwrap();
        std::fs::create_dir_all(root.join(".cache")).unwrap();
        std::fs::write(root.join("a.ts"), "").unwrap();
        std::fs::write(root.join("a.test.ts"), "").unwrap();
        std::fs::write(root.join("types.d.ts"), "").unwrap();
        std::fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        std::fs::write(root.join("legacy/old.js"), "").unwrap();
        std::fs::write(root.join(".cache/x.ts"), "").unwrap();

        let config = Config::parse_str("exclude: ['legacy/**']").unwrap();
        let files = collect_files(root, &config).unwrap();
        assert_eq!(files, vec![root.join("a.ts")]);
    }
}
