//! Structured diagnostics returned instead of, or alongside, analysis output.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The module text is not syntactically valid. Fatal to the request.
    ParseError,
    /// An export was recognized but could not be classified. Non-fatal.
    UnsupportedExport,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::ParseError => "parse error",
            DiagnosticKind::UnsupportedExport => "unsupported export",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 1-indexed line/column location in the module text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Convert a tree-sitter point (0-indexed) into a position.
    pub fn from_point(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A diagnostic payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn parse_error(message: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::ParseError,
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn unsupported_export(message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedExport,
            message: message.into(),
            position,
        }
    }

    /// Whether this diagnostic aborts the whole analysis.
    pub fn is_fatal(&self) -> bool {
        self.kind == DiagnosticKind::ParseError
    }
}
