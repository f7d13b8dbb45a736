//! Export analysis.
//!
//! Turns the structural view produced by `parser` into classified export
//! symbols:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ ParsedModule │────▶│ Classifier   │────▶│ ExportSymbol[] │
//! │ (decls,      │     │ (resolve +   │     │ + warnings     │
//! │  exports)    │     │  tag kinds)  │     └────────────────┘
//! └──────────────┘     └──────────────┘
//! ```

mod classify;
mod symbols;

pub use classify::{classify, Classification, DEFAULT_EXPORT};
pub use symbols::{ExportKind, ExportSymbol, MethodSymbol, SymbolShape};
