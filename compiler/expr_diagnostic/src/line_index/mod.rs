//! Cursor to line/column lookup.
//!
//! The compiler reports failures as a character cursor into the expression
//! text. The reporting layer turns that cursor into a 1-based line and column
//! with a [`LineIndex`] built once per source.

/// Pre-computed character offsets of each line start.
///
/// # Example
///
/// ```
/// use expr_diagnostic::LineIndex;
///
/// let index = LineIndex::build("a = 1\nb = a +\n  c");
///
/// assert_eq!(index.locate(0), (1, 1));  // 'a'
/// assert_eq!(index.locate(6), (2, 1));  // 'b'
/// assert_eq!(index.locate(16), (3, 3)); // 'c'
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LineIndex {
    /// Character offset of each line start. `starts[0]` is always 0.
    starts: Vec<usize>,
    /// Total number of characters in the source.
    len: usize,
}

impl LineIndex {
    /// Scan `source` once and record where each line begins.
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0];
        let mut len = 0;
        for (i, c) in source.chars().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
            len = i + 1;
        }
        LineIndex { starts, len }
    }

    /// 1-based line containing `cursor`.
    ///
    /// Cursors past the end of the source land on the last line.
    #[inline]
    pub fn line_of(&self, cursor: usize) -> u32 {
        let idx = match self.starts.binary_search(&cursor) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based `(line, column)` of `cursor`, both counted in characters.
    pub fn locate(&self, cursor: usize) -> (u32, u32) {
        let line = self.line_of(cursor);
        let line_start = self.line_start(line).unwrap_or(0);
        let column = cursor.min(self.len).saturating_sub(line_start);
        (line, u32::try_from(column).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Character offset where a 1-based line starts.
    ///
    /// Returns `None` for line 0 or lines past the end.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        let idx = usize::try_from(line.checked_sub(1)?).ok()?;
        self.starts.get(idx).copied()
    }

    /// Number of lines in the source. An empty source has one line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Number of characters in the source.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the source was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
