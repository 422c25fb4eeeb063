//! Source excerpts around a cursor position.
//!
//! The excerpt is a bounded window over the raw character buffer. It does not
//! look at line structure: a window may span newlines, and the cursor is a
//! character index, not a byte offset.
//!
//! ```
//! use expr_diagnostic::extract_snippet;
//!
//! assert_eq!(extract_snippet(Some("a + (b * c"), 4), "a + (b * ");
//! assert_eq!(extract_snippet(None, 4), "Unknown");
//! ```

/// Text rendered in place of an excerpt when no source is attached.
pub const UNKNOWN_SNIPPET: &str = "Unknown";

/// Shape of the excerpt window around a cursor.
///
/// The default (10 before, 20 after) is the window every rendering path uses.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SnippetWindow {
    /// Characters shown before the cursor.
    pub before: usize,
    /// Characters shown after the cursor.
    ///
    /// When the window runs past the end of the source it is pulled left by
    /// this many characters.
    pub after: usize,
}

impl Default for SnippetWindow {
    fn default() -> Self {
        SnippetWindow {
            before: 10,
            after: 20,
        }
    }
}

impl SnippetWindow {
    /// Create a window with explicit leading and trailing context.
    pub const fn new(before: usize, after: usize) -> Self {
        SnippetWindow { before, after }
    }

    /// Width of the window when it fits inside the source.
    pub const fn width(&self) -> usize {
        self.before + self.after
    }

    /// Longest excerpt this window can produce.
    ///
    /// Pulling the window left near the end of the source widens it, so this
    /// is larger than [`width`](Self::width).
    pub const fn max_len(&self) -> usize {
        (self.before + 2 * self.after).saturating_sub(2)
    }

    /// Compute the `[start, end)` character range for `cursor` in a source
    /// of `len` characters, before leading whitespace is skipped.
    ///
    /// Always returns an in-bounds range; degenerate windows collapse to
    /// `(0, 0)`.
    fn bounds(self, len: usize, cursor: isize) -> (usize, usize) {
        let len = to_signed(len);
        let before = to_signed(self.before);
        let after = to_signed(self.after);

        let mut start = cursor.saturating_sub(before);
        let mut end = cursor.saturating_add(after);

        if end > len {
            end = len - 1;
            start = start.saturating_sub(after);
        }

        let start = usize::try_from(start).unwrap_or(0);
        let Ok(end) = usize::try_from(end) else {
            return (0, 0);
        };
        if end <= start {
            return (0, 0);
        }
        (start, end)
    }
}

/// Extract the excerpt of `source` shown near `cursor`.
///
/// Returns [`UNKNOWN_SNIPPET`] when `source` is absent. Any cursor value is
/// accepted, including negative ones and ones past the end of the buffer;
/// windows that clamp to nothing yield an empty string.
pub fn extract_snippet(source: Option<&str>, cursor: isize) -> String {
    extract_snippet_with(SnippetWindow::default(), source, cursor)
}

/// Like [`extract_snippet`], with a custom window.
pub fn extract_snippet_with(window: SnippetWindow, source: Option<&str>, cursor: isize) -> String {
    let Some(source) = source else {
        return UNKNOWN_SNIPPET.to_owned();
    };

    let (start, end) = window.bounds(source.chars().count(), cursor);
    let mut visible = source
        .char_indices()
        .skip(start)
        .take(end - start)
        .skip_while(|&(_, c)| is_whitespace(c));

    let Some((from, first)) = visible.next() else {
        return String::new();
    };
    let to = visible
        .last()
        .map_or(from + first.len_utf8(), |(i, c)| i + c.len_utf8());
    source[from..to].to_owned()
}

/// Space and every control character below it. Unicode spaces such as
/// U+00A0 are kept.
#[inline]
fn is_whitespace(c: char) -> bool {
    c <= ' '
}

#[inline]
fn to_signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
