/// Maps byte offsets to 1-based line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self { line_starts }
    }

    /// 1-based line and byte column.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&s| s <= offset).max(1) - 1;
        let col = offset - self.line_starts[line] + 1;
        (line as u32 + 1, col)
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indent_at<'a>(&self, text: &'a str, offset: u32) -> &'a str {
        let (line, _) = self.line_col(offset);
        let start = self.line_starts[line as usize - 1] as usize;
        let rest = text.get(start..).unwrap_or_default();
        let end = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_to_positions() {
        let text = "package p\n\n\tx := T{}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(10), (2, 1));
        assert_eq!(index.line_col(17), (3, 7));
        assert_eq!(index.indent_at(text, 17), "\t");
    }
}
