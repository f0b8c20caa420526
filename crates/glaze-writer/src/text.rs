/// Indent-tracking line sink shared by the textual writers.
#[derive(Debug, Default)]
pub struct TextWriter {
    out: String,
    depth: usize,
}

const INDENT: &str = "  ";

impl TextWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent below column zero");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Appends one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_follow_the_indent_level() {
        let mut text = TextWriter::new();

        text.line("fn main() {");
        text.indent();
        text.line("discard;");
        text.dedent();
        text.line("}");

        assert_eq!(text.finish(), "fn main() {\n  discard;\n}\n");
    }
}
