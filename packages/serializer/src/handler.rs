//! Script handlers (function-valued fields)

use serde::{Deserialize, Serialize};

use crate::SerializeError;

const NOOP_SOURCE: &str = "() => {}";

/// A function-valued field, kept as its script source.
///
/// Handlers are opaque to this workspace: they are stored, compared, copied
/// and persisted, never executed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handler {
    source: String,
}

impl Handler {
    /// Wrap source text without validating it
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Handler that does nothing; the fallback for undecodable sources
    pub fn noop() -> Self {
        Self::new(NOOP_SOURCE)
    }

    /// Validate source text and wrap it.
    ///
    /// Accepts `function` declarations, `async` functions and arrow
    /// functions whose brackets balance outside of string literals.
    pub fn compile(source: &str) -> Result<Self, SerializeError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SerializeError::EmptySource);
        }

        let looks_callable = trimmed.starts_with("function")
            || trimmed.starts_with("async")
            || trimmed.contains("=>");
        if !looks_callable {
            return Err(SerializeError::NotAFunction(truncate(trimmed, 40)));
        }

        check_delimiters(trimmed)?;
        Ok(Self::new(trimmed))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_noop(&self) -> bool {
        self.source == NOOP_SOURCE
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn check_delimiters(source: &str) -> Result<(), SerializeError> {
    let mut expected: Vec<char> = Vec::new();
    let mut chars = source.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' | '\'' | '`' => {
                let mut closed = false;
                while let Some((_, next)) = chars.next() {
                    if next == '\\' {
                        chars.next();
                    } else if next == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(SerializeError::UnterminatedString(offset));
                }
            }
            '(' => expected.push(')'),
            '[' => expected.push(']'),
            '{' => expected.push('}'),
            ')' | ']' | '}' => {
                if expected.pop() != Some(c) {
                    return Err(SerializeError::UnbalancedDelimiter(offset));
                }
            }
            _ => {}
        }
    }

    if expected.is_empty() {
        Ok(())
    } else {
        Err(SerializeError::UnbalancedDelimiter(source.len()))
    }
}
