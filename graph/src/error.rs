use thiserror::Error;

/// Errors raised while rebuilding the graph from `jj log` output
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A node line without the full change id. The display template and the
    /// parser disagree, so nothing after this line can be trusted.
    #[error("line {line}: node has no change id field: {text:?}")]
    MissingChangeId { line: usize, text: String },
}

/// Errors raised while applying style configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("invalid background parameter {0:?}")]
    InvalidBackground(String),
}
