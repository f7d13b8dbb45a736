//! JavaScript identifier rules for generated code.

use std::collections::HashSet;

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;

lazy_static! {
    /// IdentifierName: usable after `.` and in import/export lists.
    static ref IDENTIFIER_NAME: Regex =
        Regex::new(r"^[\p{XID_Start}_$][\p{XID_Continue}$]*$").unwrap();
}

/// Words that cannot be used as local bindings in strict-mode module code.
static RESERVED: phf::Set<&'static str> = phf_set! {
    "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "null", "package", "private",
    "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    "arguments", "eval",
};

/// Whether `name` can follow a `.` or appear in an import list.
pub fn is_identifier_name(name: &str) -> bool {
    IDENTIFIER_NAME.is_match(name)
}

/// Whether `name` can be declared as a local binding.
pub fn is_binding_name(name: &str) -> bool {
    is_identifier_name(name) && !RESERVED.contains(name)
}

/// Turn arbitrary text into a valid binding name.
pub fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) || RESERVED.contains(out.as_str()) {
        out.insert(0, '_');
    }
    out
}

/// Single-quoted JavaScript string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `object.name`, or `object['name']` when the name needs quoting.
pub fn member_access(object: &str, name: &str) -> String {
    if is_identifier_name(name) {
        format!("{}.{}", object, name)
    } else {
        format!("{}[{}]", object, quote(name))
    }
}

/// Hands out unique binding names within one scope.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    used: HashSet<String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as taken without allocating it.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// Allocate `preferred` (sanitized), suffixing a number on clashes.
    pub fn alloc(&mut self, preferred: &str) -> String {
        let base = if is_binding_name(preferred) {
            preferred.to_string()
        } else {
            sanitize(preferred)
        };
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_binding_name("iAmClass"));
        assert!(is_binding_name("$store"));
        assert!(is_binding_name("_private"));
        assert!(is_binding_name("größe"));
        assert!(!is_binding_name("delete"));
        assert!(is_identifier_name("delete"));
        assert!(!is_identifier_name("kebab-case"));
        assert!(!is_identifier_name("1st"));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("kebab-case"), "kebab_case");
        assert_eq!(sanitize("1st"), "_1st");
        assert_eq!(sanitize("delete"), "_delete");
        assert_eq!(sanitize(""), "_");
    }

    #[test]
    fn test_quote_and_member_access() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(member_access("instance", "run"), "instance.run");
        assert_eq!(member_access("instance", "do-it"), "instance['do-it']");
    }

    #[test]
    fn test_bindings_suffix_on_clash() {
        let mut b = Bindings::new();
        b.reserve("result");
        assert_eq!(b.alloc("result"), "result2");
        assert_eq!(b.alloc("value"), "value");
        assert_eq!(b.alloc("value"), "value2");
        assert_eq!(b.alloc("new"), "_new");
    }
}
