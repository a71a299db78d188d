use thiserror::Error;

/// First syntax error found in a source text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (at byte {offset})")]
pub struct ParseError {
    pub message: String,
    pub offset: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: u32) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}
