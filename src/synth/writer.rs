//! Indentation-aware line writer.

/// Builds generated source one line at a time.
pub struct CodeWriter {
    out: String,
    level: usize,
    unit: String,
}

impl CodeWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            out: String::new(),
            level: 0,
            unit: " ".repeat(indent_width),
        }
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(&self.unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write a line and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.level += 1;
    }

    /// Dedent and write a closing line.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.level = self.level.saturating_sub(1);
        self.line(text);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting() {
        let mut w = CodeWriter::new(2);
        w.open("describe('x', () => {");
        w.open("test('y', () => {");
        w.line("expect(x).toBeDefined();");
        w.close("});");
        w.blank();
        w.close("});");
        assert_eq!(
            w.finish(),
            "describe('x', () => {\n  test('y', () => {\n    expect(x).toBeDefined();\n  });\n\n});\n"
        );
    }
}
