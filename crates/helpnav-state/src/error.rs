//! State decoding errors.

use thiserror::Error;

/// Errors raised while decoding an encoded UI state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Encoded state is empty")]
    Empty,

    #[error("Invalid base64: {0}")]
    Base64(String),

    #[error("Unsupported state version: {0}")]
    UnsupportedVersion(u8),

    #[error("Truncated state: {needed} bytes needed at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Varint too long at offset {0}")]
    VarintOverflow(usize),

    #[error("Field '{0}' appears more than once")]
    DuplicateField(&'static str),

    #[error("Field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("Field '{field}' value {value} is out of range")]
    OutOfRange { field: &'static str, value: u64 },

    #[error("Field '{field}' has {extra} unexpected trailing bytes")]
    TrailingBytes { field: &'static str, extra: usize },

    #[error("Field '{field}' cannot hold a {actual} value")]
    TypeMismatch {
        field: &'static str,
        actual: &'static str,
    },
}

impl From<base64::DecodeError> for StateError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err.to_string())
    }
}
