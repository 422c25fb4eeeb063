//! Finer-grained problems collected during a single compilation pass.

use std::fmt;

use crate::LineIndex;

/// One problem found while compiling an expression.
///
/// A compile pass that keeps going after the first problem collects these and
/// hands the batch to [`CompileError::aggregate`](crate::CompileError::aggregate).
/// Critical details are errors; the rest are warnings.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorDetail {
    message: String,
    cursor: Option<usize>,
    critical: bool,
    line: Option<u32>,
    column: Option<u32>,
}

impl ErrorDetail {
    fn new(message: String, critical: bool) -> Self {
        ErrorDetail {
            message,
            cursor: None,
            critical,
            line: None,
            column: None,
        }
    }

    /// Create a critical detail.
    #[cold]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), true)
    }

    /// Create a non-critical detail.
    #[cold]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), false)
    }

    /// Attach the character offset the detail refers to.
    #[must_use]
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Attach a 1-based line and column.
    #[must_use]
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Derive line and column from the cursor.
    ///
    /// Details without a cursor are returned unchanged.
    #[must_use]
    pub fn locate(self, index: &LineIndex) -> Self {
        match self.cursor {
            Some(cursor) => {
                let (line, column) = index.locate(cursor);
                self.with_position(line, column)
            }
            None => self,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn line_number(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) ",
            PositionPart(self.line),
            PositionPart(self.column)
        )?;
        if !self.critical {
            write!(f, "WARNING: ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Renders an unset line or column as `-1`.
pub(crate) struct PositionPart(pub(crate) Option<u32>);

impl fmt::Display for PositionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "-1"),
        }
    }
}
