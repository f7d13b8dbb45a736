//! Zubora - test scaffolds for JavaScript and TypeScript modules.
//!
//! Zubora reads the source of an ES module, works out what it exports and
//! renders a Jest or Vitest skeleton with one `describe` block per export.
//!
//! # Architecture
//!
//! Data flows strictly forward:
//!
//! - `parser`: tree-sitter parse and lowering of the top level
//! - `analysis`: resolves each exported binding and tags its shape
//! - `synth`: renders the classified exports as test-stub text
//! - `engine`: the single entry point driving the three above
//! - `session`: a caller-owned worker that keeps only the latest result
//! - `config`, `report`, `cli`: the command-line tool around the core
//!
//! ```no_run
//! let template = zubora::analyze("export async function load() {}").unwrap();
//! assert_eq!(template.blocks, 1);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod parser;
pub mod report;
pub mod session;
pub mod synth;

pub use analysis::{classify, Classification, ExportKind, ExportSymbol, MethodSymbol, SymbolShape};
pub use config::Config;
pub use diagnostic::{Diagnostic, DiagnosticKind, Position};
pub use engine::{analyze, Analyzer, ExportListing, RenderedTemplate};
pub use parser::{Dialect, ModuleParser, ParsedModule, SourceModule, SyntaxKind};
pub use session::{Response, Session, SessionError};
pub use synth::{Synthesizer, TemplateOptions, TestStyle};
