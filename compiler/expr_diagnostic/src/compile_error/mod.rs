//! The compile failure raised while compiling an expression.
//!
//! A [`CompileError`] is built once at the raise site with whatever context
//! is at hand, then optionally enriched by the layer that catches it (line and
//! column, sub-errors) before being rendered or propagated.
//!
//! All construction goes through [`CompileErrorOptions`]. The named presets on
//! `CompileError` cover the combinations raise sites actually use:
//!
//! | Preset                   | Message | Source + cursor | Cause | Sub-errors |
//! |--------------------------|---------|-----------------|-------|------------|
//! | `new`                    | empty   |                 |       |            |
//! | `from_message`           | yes     |                 |       |            |
//! | `aggregate`              | yes     |                 |       | yes        |
//! | `at_cursor`              | yes     | cursor only     |       |            |
//! | `in_source`              | yes     | yes             |       |            |
//! | `in_source_caused_by`    | yes     | yes             | yes   |            |
//! | `formatted`              | yes     | yes             | opt   |            |
//! | `caused_by`              | yes     |                 | yes   |            |
//! | `from_cause`             | cause's |                 | yes   |            |

use std::fmt;
use std::sync::Arc;

use crate::detail::PositionPart;
use crate::{extract_snippet, ErrorDetail, LineIndex};

/// Shared handle to the error that triggered a compile failure.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Everything a raise site may know about a compile failure.
///
/// This is the single construction path for [`CompileError`].
///
/// # Example
///
/// ```
/// use expr_diagnostic::CompileErrorOptions;
///
/// let err = CompileErrorOptions::new("unexpected `)`")
///     .source("foo(a, b))", 9)
///     .into_error();
///
/// assert_eq!(err.cursor(), Some(9));
/// ```
#[derive(Clone, Debug, Default)]
#[must_use = "options do nothing until turned into an error"]
pub struct CompileErrorOptions {
    /// Main message. When `None`, the cause's text is used, or the empty
    /// string if there is no cause either.
    pub message: Option<String>,
    /// Expression text being compiled.
    pub expr: Option<Arc<str>>,
    /// Character offset of the failure.
    pub cursor: Option<usize>,
    /// Underlying error.
    pub cause: Option<Cause>,
    /// Sub-errors collected during the pass.
    pub errors: Option<Vec<ErrorDetail>>,
    /// Bake the excerpt and position into the stored message at construction
    /// time.
    pub eager_format: bool,
}

impl CompileErrorOptions {
    /// Start from a message.
    pub fn new(message: impl Into<String>) -> Self {
        CompileErrorOptions {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach the expression text and the cursor into it.
    pub fn source(mut self, expr: impl Into<Arc<str>>, cursor: usize) -> Self {
        self.expr = Some(expr.into());
        self.cursor = Some(cursor);
        self
    }

    /// Attach a cursor without any expression text.
    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Chain an underlying error.
    pub fn cause<E>(self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.shared_cause(Arc::new(cause))
    }

    /// Chain an underlying error that is already shared.
    pub fn shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Attach a batch of sub-errors, stored as given.
    pub fn errors(mut self, errors: Vec<ErrorDetail>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Pre-format the stored message with the excerpt and position.
    pub fn eager_format(mut self, eager: bool) -> Self {
        self.eager_format = eager;
        self
    }

    /// Build the error.
    pub fn into_error(self) -> CompileError {
        let CompileErrorOptions {
            message,
            expr,
            cursor,
            cause,
            errors,
            eager_format,
        } = self;

        let message = message
            .or_else(|| cause.as_ref().map(ToString::to_string))
            .unwrap_or_default();

        let message = if eager_format {
            let raw = raw_cursor(cursor);
            let snippet = extract_snippet(expr.as_deref(), raw);
            format!(
                "Failed to compile:\n[Error: {message}]\n[Near: {{ ... {snippet} ... }} ]\n[Position: {raw}]"
            )
        } else {
            message
        };

        tracing::trace!(
            cursor = raw_cursor(cursor),
            has_source = expr.is_some(),
            has_cause = cause.is_some(),
            eager_format,
            "raising compile error"
        );

        CompileError {
            message,
            expr,
            cursor,
            line: None,
            column: None,
            cause,
            errors,
        }
    }
}

impl From<CompileErrorOptions> for CompileError {
    fn from(options: CompileErrorOptions) -> Self {
        options.into_error()
    }
}

/// A failure to compile an expression.
///
/// Renders as
///
/// ```text
/// [Error: {message}]
/// [Near : {... {excerpt} ....}]
/// [Line: {line}, Column: {column}]
/// ```
///
/// where the last line only appears once a line number has been attached.
#[derive(Clone, Debug, Default)]
#[must_use = "compile errors should be reported or returned, not silently dropped"]
pub struct CompileError {
    message: String,
    expr: Option<Arc<str>>,
    cursor: Option<usize>,
    line: Option<u32>,
    column: Option<u32>,
    cause: Option<Cause>,
    errors: Option<Vec<ErrorDetail>>,
}

impl CompileError {
    /// Build from a full set of options.
    pub fn from_options(options: CompileErrorOptions) -> Self {
        options.into_error()
    }

    /// A failure with no message and no context.
    #[cold]
    pub fn new() -> Self {
        CompileErrorOptions::default().into_error()
    }

    /// A failure with only a message.
    #[cold]
    pub fn from_message(message: impl Into<String>) -> Self {
        CompileErrorOptions::new(message).into_error()
    }

    /// A summary failure over a batch of sub-errors.
    #[cold]
    pub fn aggregate(message: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        CompileErrorOptions::new(message).errors(errors).into_error()
    }

    /// A failure at a bare offset, without the expression text.
    #[cold]
    pub fn at_cursor(message: impl Into<String>, cursor: usize) -> Self {
        CompileErrorOptions::new(message).cursor(cursor).into_error()
    }

    /// A failure at `cursor` inside `expr`.
    #[cold]
    pub fn in_source(message: impl Into<String>, expr: impl Into<Arc<str>>, cursor: usize) -> Self {
        CompileErrorOptions::new(message)
            .source(expr, cursor)
            .into_error()
    }

    /// A failure at `cursor` inside `expr`, triggered by `cause`.
    #[cold]
    pub fn in_source_caused_by<E>(
        message: impl Into<String>,
        expr: impl Into<Arc<str>>,
        cursor: usize,
        cause: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CompileErrorOptions::new(message)
            .source(expr, cursor)
            .cause(cause)
            .into_error()
    }

    /// A failure at `cursor` inside `expr` whose message is optionally
    /// pre-formatted.
    ///
    /// With `concat` set, the stored message becomes
    ///
    /// ```text
    /// Failed to compile:
    /// [Error: {message}]
    /// [Near: { ... {excerpt} ... } ]
    /// [Position: {cursor}]
    /// ```
    ///
    /// with the excerpt taken now. Later updates to the expression or cursor
    /// do not touch it, while [`Display`](fmt::Display) re-reads them.
    #[cold]
    pub fn formatted(
        message: impl Into<String>,
        expr: impl Into<Arc<str>>,
        cursor: usize,
        concat: bool,
        cause: Option<Cause>,
    ) -> Self {
        let options = CompileErrorOptions {
            cause,
            ..CompileErrorOptions::new(message)
        };
        options
            .source(expr, cursor)
            .eager_format(concat)
            .into_error()
    }

    /// Wrap `cause` under a new message.
    #[cold]
    pub fn caused_by<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CompileErrorOptions::new(message).cause(cause).into_error()
    }

    /// Wrap `cause`, reusing its text as the message.
    #[cold]
    pub fn from_cause<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CompileErrorOptions::default().cause(cause).into_error()
    }

    /// Replace the cursor.
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Mark the cursor as unknown.
    pub fn without_cursor(mut self) -> Self {
        self.cursor = None;
        self
    }

    /// Replace the expression text.
    pub fn with_expr(mut self, expr: impl Into<Arc<str>>) -> Self {
        self.expr = Some(expr.into());
        self
    }

    /// Drop the expression text. Rendering falls back to `"Unknown"`.
    pub fn without_expr(mut self) -> Self {
        self.expr = None;
        self
    }

    pub fn with_line_number(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Attach a 1-based line and column together.
    pub fn with_position(self, line: u32, column: u32) -> Self {
        tracing::trace!(line, column, "annotating compile error position");
        self.with_line_number(line).with_column(column)
    }

    /// Replace the sub-errors.
    pub fn with_errors(mut self, errors: Vec<ErrorDetail>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Derive line and column from the cursor using `index`.
    ///
    /// Errors without a cursor are returned unchanged.
    pub fn locate(self, index: &LineIndex) -> Self {
        match self.cursor {
            Some(cursor) => {
                let (line, column) = index.locate(cursor);
                self.with_position(line, column)
            }
            None => self,
        }
    }

    /// Derive line and column from the cursor and the attached expression.
    ///
    /// Errors missing either are returned unchanged.
    pub fn locate_in_source(self) -> Self {
        match (&self.expr, self.cursor) {
            (Some(expr), Some(_)) => {
                let index = LineIndex::build(expr);
                self.locate(&index)
            }
            _ => self,
        }
    }

    /// The stored message, pre-formatted if built with `eager_format`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The expression text, if attached.
    pub fn expr(&self) -> Option<&str> {
        self.expr.as_deref()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The cursor with `-1` standing in for "unknown".
    pub fn raw_cursor(&self) -> isize {
        raw_cursor(self.cursor)
    }

    pub fn line_number(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    /// The underlying error, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Sub-errors collected during the pass. Empty when none were attached.
    pub fn errors(&self) -> &[ErrorDetail] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Whether a sub-error batch was attached at all, even an empty one.
    pub fn has_errors_set(&self) -> bool {
        self.errors.is_some()
    }

    /// The excerpt shown near the cursor, or `"Unknown"` without source.
    pub fn snippet(&self) -> String {
        extract_snippet(self.expr(), self.raw_cursor())
    }

    /// Render for users. Same as the `Display` output.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Error: {}]\n[Near : {{... {} ....}}]",
            self.message,
            self.snippet()
        )?;
        if let Some(line) = self.line {
            write!(f, "\n[Line: {line}, Column: {}]", PositionPart(self.column))?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[inline]
fn raw_cursor(cursor: Option<usize>) -> isize {
    cursor.map_or(-1, |c| isize::try_from(c).unwrap_or(isize::MAX))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
