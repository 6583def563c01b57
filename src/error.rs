//! Error definitions for all `apidecl` generation stages.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum GenError {
    /// Schema text is not a JSON array of blocks.
    #[error("schema parse error: {0}")]
    Parse(String),
    /// Schema parsed but contains no blocks to process.
    #[error("schema contains no blocks")]
    EmptySchema,
    /// Output destination could not be opened, written or finalized.
    #[error("sink error for block '{block}': {message}")]
    Sink { block: String, message: String },
    /// Event literal rejected by the strict literal policy.
    #[error("suspicious event literal in block '{block}': event '{event}' has literal {literal:?}")]
    SuspiciousLiteral {
        block: String,
        event: String,
        literal: String,
    },
    /// Invalid generator options.
    #[error("config error: {0}")]
    Config(String),
    /// Remote schema fetch or cache failure.
    #[error("fetch error: {0}")]
    Fetch(String),
    /// Filesystem I/O error from CLI or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    pub(crate) fn sink(block: &str, message: impl std::fmt::Display) -> Self {
        GenError::Sink {
            block: block.to_string(),
            message: message.to_string(),
        }
    }
}
