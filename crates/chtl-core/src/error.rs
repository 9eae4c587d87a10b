use thiserror::Error;

/// Errors raised by the path canonicalizer and the scanner's hard-failure
/// paths (the scanner's soft failures are reported as [`crate::Diagnostic`]s
/// instead, since it never aborts).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[SyntaxError {file}:{line}:{col}] {message}")]
    Syntax { file: String, line: usize, col: usize, message: String },
}
