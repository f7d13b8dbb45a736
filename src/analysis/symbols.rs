//! Classified export symbols.

use serde::Serialize;
use std::fmt;

use crate::parser::ast::Param;

/// Kind of an exported symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Class,
    Variable,
    Unknown,
}

impl ExportKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Function => "function",
            ExportKind::Class => "class",
            ExportKind::Variable => "variable",
            ExportKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A method of an exported class that gets its own stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSymbol {
    pub name: String,
    pub is_async: bool,
    /// Static methods are called on the class, not an instance.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
    pub params: Vec<Param>,
}

/// What an export resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolShape {
    Function {
        is_async: bool,
        params: Vec<Param>,
    },
    Class {
        constructor_params: Vec<Param>,
        methods: Vec<MethodSymbol>,
    },
    Variable,
    /// Recognized but not classifiable; rendered as a generic stub.
    Unknown,
}

/// One exported binding of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSymbol {
    /// Name importers use (`"default"` for the default export).
    pub external_name: String,
    /// Name of the binding inside the module.
    pub internal_name: String,
    pub is_default: bool,
    #[serde(flatten)]
    pub shape: SymbolShape,
    /// 1-indexed line of the export statement.
    pub line: usize,
}

impl ExportSymbol {
    pub fn kind(&self) -> ExportKind {
        match self.shape {
            SymbolShape::Function { .. } => ExportKind::Function,
            SymbolShape::Class { .. } => ExportKind::Class,
            SymbolShape::Variable => ExportKind::Variable,
            SymbolShape::Unknown => ExportKind::Unknown,
        }
    }

    /// Whether the export itself is an async function.
    pub fn is_async(&self) -> bool {
        matches!(self.shape, SymbolShape::Function { is_async: true, .. })
    }

    /// Stub-target methods (classes only).
    pub fn methods(&self) -> &[MethodSymbol] {
        match &self.shape {
            SymbolShape::Class { methods, .. } => methods,
            _ => &[],
        }
    }

    /// Whether the external and internal names differ.
    pub fn is_renamed(&self) -> bool {
        !self.is_default && self.external_name != self.internal_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(shape: SymbolShape) -> ExportSymbol {
        ExportSymbol {
            external_name: "iAmRenamed".to_string(),
            internal_name: "iWillBeRenamed".to_string(),
            is_default: false,
            shape,
            line: 1,
        }
    }

    #[test]
    fn test_derived_views() {
        let func = symbol(SymbolShape::Function {
            is_async: true,
            params: vec![],
        });
        assert_eq!(func.kind(), ExportKind::Function);
        assert!(func.is_async());
        assert!(func.methods().is_empty());
        assert!(func.is_renamed());

        let class = symbol(SymbolShape::Class {
            constructor_params: vec![],
            methods: vec![MethodSymbol {
                name: "run".to_string(),
                is_async: true,
                is_static: false,
                params: vec![],
            }],
        });
        assert_eq!(class.kind(), ExportKind::Class);
        // an async method does not make the class async
        assert!(!class.is_async());
        assert_eq!(class.methods().len(), 1);
    }

    #[test]
    fn test_json_is_flat_and_tagged() {
        let func = symbol(SymbolShape::Function {
            is_async: false,
            params: vec![Param::new("x")],
        });
        let json = serde_json::to_value(&func).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(json["external_name"], "iAmRenamed");
        assert_eq!(json["is_async"], false);
        assert_eq!(json["params"][0]["name"], "x");

        let unknown = serde_json::to_value(symbol(SymbolShape::Unknown)).unwrap();
        assert_eq!(unknown["kind"], "unknown");
    }
}
