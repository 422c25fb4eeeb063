//! Compile-failure diagnostics for the expression compiler.
//!
//! A [`CompileError`] records one failure raised while compiling an
//! expression:
//! - The message (what went wrong)
//! - The expression text and a character cursor into it (where)
//! - Optionally a line and column, attached by the reporting layer
//! - Optionally the error that caused it
//! - Optionally a batch of [`ErrorDetail`] sub-errors from the same pass
//!
//! Rendering shows a short excerpt of the expression around the cursor:
//!
//! ```
//! use expr_diagnostic::CompileError;
//!
//! let err = CompileError::in_source("unexpected `*`", "price * * qty", 8)
//!     .locate_in_source();
//!
//! assert_eq!(
//!     err.to_string(),
//!     "[Error: unexpected `*`]\n[Near : {... price * * qt ....}]\n[Line: 1, Column: 9]"
//! );
//! ```

mod compile_error;
mod detail;
mod line_index;
mod snippet;

pub use compile_error::{Cause, CompileError, CompileErrorOptions};
pub use detail::ErrorDetail;
pub use line_index::LineIndex;
pub use snippet::{extract_snippet, extract_snippet_with, SnippetWindow, UNKNOWN_SNIPPET};
