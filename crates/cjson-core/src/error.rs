//! Error types for JSON decoding and encoding operations.

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur during decoding or encoding.
///
/// Every failure is total: no partially built value is ever handed back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The decoder met a byte that does not fit the production it was parsing
    /// (unexpected character, missing `:` or separator, unterminated string,
    /// absent numeral, unmatched keyword).
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A complete top-level value was parsed but non-whitespace bytes remain.
    #[error("unexpected trailing characters at byte {offset}")]
    TrailingData { offset: usize },

    /// The encoder met a value it has no JSON rendering for.
    #[error("unsupported type for JSON serialization: {0}")]
    UnsupportedType(String),

    /// The encoder met a mapping entry whose key is not a string.
    #[error("dictionary key must be string")]
    NonStringKey,
}

/// Fieldless classification of [`Error`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    TrailingData,
    UnsupportedType,
    NonStringKey,
}

impl Error {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::TrailingData { .. } => ErrorKind::TrailingData,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::NonStringKey => ErrorKind::NonStringKey,
        }
    }

    /// Byte offset into the decoder input, for decode-side errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. } | Error::TrailingData { offset } => Some(*offset),
            Error::UnsupportedType(_) | Error::NonStringKey => None,
        }
    }
}

// A host value that refuses to serialize itself is, from the codec's point of
// view, a value with no JSON rendering.
impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::UnsupportedType(msg.to_string())
    }
}

/// Convenience alias used throughout cjson-core.
pub type Result<T> = std::result::Result<T, Error>;
