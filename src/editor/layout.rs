//! Canonical indentation shared by the generated fragment blocks.

/// Column at which generated blocks start inside a marker span.
pub const BASE_INDENT: usize = 20;
const STEP: usize = 4;

/// Builds a block of indented lines joined with `\n`.
#[derive(Default)]
pub struct Markup {
    lines: Vec<String>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, depth: usize, text: impl AsRef<str>) -> &mut Self {
        let mut line = indent(BASE_INDENT + depth * STEP);
        line.push_str(text.as_ref());
        self.lines.push(line);
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.lines).join("\n")
    }
}

pub fn indent(width: usize) -> String {
    " ".repeat(width)
}
