//! Indentation-aware writer for the emitted Kotlin source

/// Builds a source file line by line with four-space indentation.
#[derive(Debug, Default)]
pub struct KotlinWriter {
    buffer: String,
    indent: usize,
}

impl KotlinWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.buffer.push_str("    ");
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Writes an opening line (ending in `{`) and indents.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedents and writes a closing line.
    pub fn close(&mut self, text: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Dedents for a pivot line (`} else {`, `): T {`) and re-indents after
    /// it.
    pub fn close_and_open(&mut self, text: &str) {
        self.close(text);
        self.indent += 1;
    }

    /// Writes a KDoc block from the given lines.
    pub fn kdoc(&mut self, lines: &[String]) {
        self.line("/**");
        for doc_line in lines {
            if doc_line.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {doc_line}"));
            }
        }
        self.line(" */");
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
