//! Camera save-format codecs.
//!
//! Two formats are supported: the current line-oriented text format
//! ([`text`]) and seven generations of legacy binary records ([`legacy`]).
//! The text codec reads and writes; the legacy codec only reads, mapping
//! whatever a historical version stored onto the current camera
//! representation and deliberately dropping the rest.

pub mod legacy;
pub mod text;

use std::fmt;

pub use legacy::load_camera;
pub use text::{read_camera, write_camera};

/// A fatal camera record failure. The containing load should abort rather
/// than attempt partial recovery.
#[derive(Debug)]
pub enum CodecError {
    /// The leading version byte of a binary record exceeds the newest
    /// supported version.
    UnsupportedVersion(u8),
    /// The animation-block marker byte of a binary record held something
    /// other than 1.
    BadMarker(u8),
    /// The name length byte of a binary record held the corrupt-data
    /// sentinel.
    CorruptName,
    /// A text record ended before its terminal `NAME` line.
    IncompleteRecord,
    /// The underlying stream failed.
    Io(std::io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported camera record version {version}")
            }
            Self::BadMarker(marker) => {
                write!(f, "bad animation block marker {marker}")
            }
            Self::CorruptName => write!(f, "corrupt camera name length"),
            Self::IncompleteRecord => {
                write!(f, "camera record ended before its NAME line")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
