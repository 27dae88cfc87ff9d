//! Character offset to line number mapping.

/// Line layout of one file's text
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offset at which each line starts; always begins with 0
    line_starts: Vec<usize>,
    lines: Vec<String>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );

        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();

        Self { line_starts, lines }
    }

    /// Number of lines, counting a trailing empty line after a final
    /// newline
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing character `offset`
    ///
    /// Offsets past the end map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// 1-based inclusive line range covered by chars `[start, end)`
    ///
    /// The end line is the line holding the last character of the
    /// range, so a chunk ending right after a newline does not spill
    /// onto the next line.
    pub fn span(&self, start: usize, end: usize) -> (usize, usize) {
        let line_start = self.line_of(start);
        let last_char = end.saturating_sub(1).max(start);
        (line_start, self.line_of(last_char).max(line_start))
    }

    /// Lines `[line_start - context, line_end + context]`, clamped to
    /// the file; empty when `context` is 0
    pub fn preview(&self, line_start: usize, line_end: usize, context: usize) -> Vec<String> {
        if context == 0 {
            return Vec::new();
        }

        let first = line_start.saturating_sub(context).max(1);
        let last = (line_end + context).min(self.lines.len());
        if first > last {
            return Vec::new();
        }
        self.lines[first - 1..last].to_vec()
    }
}
