//! Error types for the serializer

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("Function source is empty")]
    EmptySource,

    #[error("Not a function expression: {0}")]
    NotAFunction(String),

    #[error("Unbalanced delimiter at offset {0}")]
    UnbalancedDelimiter(usize),

    #[error("Unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Handler {handler} cannot decode a {found} value")]
    UnexpectedInput {
        handler: &'static str,
        found: &'static str,
    },
}

impl From<serde_json::Error> for SerializeError {
    fn from(e: serde_json::Error) -> Self {
        SerializeError::Json(e.to_string())
    }
}
