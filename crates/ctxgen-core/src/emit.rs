//! Text emission for generators
//!
//! One `Emitter` is created per artifact and passed to its generator.

/// Line-oriented output buffer with indentation
#[derive(Debug)]
pub struct Emitter {
    /// Output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per level
    indent_size: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Emitter {
    pub fn new(indent_size: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_size,
        }
    }

    /// Write one indented line
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.write_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        let spaces = " ".repeat(self.indent_level * self.indent_size);
        self.output.push_str(&spaces);
    }

    /// Emitted text without trailing newlines
    pub fn finish(self) -> String {
        let mut result = self.output;
        let trimmed = result.trim_end_matches('\n').len();
        result.truncate(trimmed);
        result
    }
}
