//! The per-line output table that annotations merge into.

/// One annotation slot per physical source line, fixed at construction.
///
/// Lines are 1-based to match spans. Multiple results landing on the same
/// line are joined with `"; "` in arrival order; merges aimed outside the
/// table are dropped rather than growing it, so the output always mirrors
/// the source line for line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    lines: Vec<String>,
}

impl RenderedOutput {
    pub fn new(line_count: usize) -> Self {
        Self {
            lines: vec![String::new(); line_count],
        }
    }

    /// Appends `text` to the slot for 1-based `line`. Empty text and
    /// out-of-range lines are ignored.
    pub fn merge(&mut self, line: u32, text: &str) {
        if text.is_empty() || line == 0 {
            return;
        }
        let Some(slot) = self.lines.get_mut(line as usize - 1) else {
            return;
        };
        if !slot.is_empty() {
            slot.push_str("; ");
        }
        slot.push_str(text);
    }

    /// The annotation text for 1-based `line`, empty when nothing landed
    /// there or the line is out of range.
    pub fn line(&self, line: u32) -> &str {
        if line == 0 {
            return "";
        }
        self.lines
            .get(line as usize - 1)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether any slot holds visible text.
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|l| !l.is_empty())
    }

    /// The highest 1-based line with visible text, if any.
    pub fn last_content_line(&self) -> Option<u32> {
        self.lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map(|idx| idx as u32 + 1)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
