//! Crate-level error types.

use std::fmt;

use crate::codec::CodecError;

/// Errors produced by the vantage crate.
#[derive(Debug)]
pub enum VantageError {
    /// Camera record serialization/deserialization failure.
    Codec(CodecError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML defaults parsing/serialization failure.
    DefaultsParse(String),
}

impl fmt::Display for VantageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "camera codec error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DefaultsParse(msg) => {
                write!(f, "defaults parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for VantageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::DefaultsParse(_) => None,
        }
    }
}

impl From<CodecError> for VantageError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<std::io::Error> for VantageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
