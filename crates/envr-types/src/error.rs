//! Error types for envr-types

/// Result type for envr-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Argument errors raised while constructing paths, elements, types and qualifiers.
///
/// Every variant is a construction-time failure: values of this crate are
/// immutable, so once built they can no longer fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid element: {message}")]
    InvalidElement { message: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Parse error at column {column} of {input:?}: {message}")]
    Parse {
        input: String,
        column: usize,
        message: String,
    },

    #[error("Invalid type name {name:?}: {message}")]
    InvalidType { name: String, message: String },

    #[error("Qualifier name/value pairs must have an even length, got {count}")]
    OddQualifierPairs { count: usize },

    #[error("Invalid qualifier {segment:?}: expected name=value")]
    InvalidQualifier { segment: String },
}

impl Error {
    pub fn element(message: impl Into<String>) -> Self {
        Self::InvalidElement {
            message: message.into(),
        }
    }

    pub fn path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    pub fn parse(input: impl Into<String>, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            column,
            message: message.into(),
        }
    }
}
