//! Error types for the checkpoint layer.
//!
//! Two levels: [`FormatError`] is what a format driver reports for one
//! operation; [`DatafileError`] is what the orchestrator surfaces to the
//! caller. Per-variable read misses never appear here — they are absorbed
//! into the read outcome and reported as warnings.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors reported by a [`DataFormat`](crate::format::DataFormat) driver.
#[derive(Debug)]
pub enum FormatError {
    /// An underlying I/O error.
    Io(io::Error),
    /// An operation was attempted with no file open.
    NotOpen,
    /// A write was attempted on a file opened for reading.
    ReadOnly,
    /// The file does not start with the expected magic bytes.
    InvalidMagic,
    /// The file's format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The named variable does not exist in the file.
    VariableNotFound {
        /// The requested variable name.
        name: String,
    },
    /// The named variable exists but holds a different kind of data
    /// (e.g. a record series where a static value was requested).
    WrongType {
        /// The requested variable name.
        name: String,
    },
    /// The stored shape does not match the requested shape.
    ShapeMismatch {
        /// The requested variable name.
        name: String,
        /// The shape the caller asked for.
        expected: Vec<usize>,
        /// The shape found in the file.
        found: Vec<usize>,
    },
    /// A record read was requested but the variable has no records.
    NoRecords {
        /// The requested variable name.
        name: String,
    },
    /// The requested record index is out of range.
    RecordOutOfRange {
        /// The requested variable name.
        name: String,
        /// The requested record index.
        index: usize,
        /// Number of records present.
        len: usize,
    },
    /// The file is structurally corrupt.
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotOpen => write!(f, "no file open"),
            Self::ReadOnly => write!(f, "file is open for reading only"),
            Self::InvalidMagic => write!(f, "invalid magic bytes"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::VariableNotFound { name } => write!(f, "variable '{name}' not found"),
            Self::WrongType { name } => {
                write!(f, "variable '{name}' holds a different kind of data")
            }
            Self::ShapeMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "variable '{name}' shape mismatch: requested {expected:?}, stored {found:?}"
                )
            }
            Self::NoRecords { name } => write!(f, "variable '{name}' has no records"),
            Self::RecordOutOfRange { name, index, len } => {
                write!(
                    f,
                    "variable '{name}' record {index} out of range ({len} records)"
                )
            }
            Self::Malformed { detail } => write!(f, "malformed file: {detail}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors surfaced by a [`Datafile`](crate::datafile::Datafile) call.
///
/// Only configuration errors (duplicate or empty names, missing filename,
/// unknown format) and whole-file open/validate/close failures appear here.
#[derive(Debug)]
pub enum DatafileError {
    /// The variable name is already registered, under any kind.
    DuplicateName {
        /// The offending name.
        name: String,
    },
    /// An empty variable name was supplied at registration.
    EmptyName,
    /// An empty filename was supplied.
    EmptyFilename,
    /// A default-filename call was made with no default configured.
    NoFilename,
    /// The format-name lookup did not match any known driver.
    UnknownFormat {
        /// The requested format name.
        name: String,
    },
    /// The backend could not open the file.
    OpenFailed {
        /// The path that failed to open.
        path: PathBuf,
        /// The driver-level cause.
        source: FormatError,
    },
    /// The backend opened the file but reports an invalid handle.
    InvalidHandle {
        /// The path that produced the invalid handle.
        path: PathBuf,
    },
    /// The backend failed to close (and for write passes, flush) the file.
    CloseFailed {
        /// The path that failed to close.
        path: PathBuf,
        /// The driver-level cause.
        source: FormatError,
    },
}

impl fmt::Display for DatafileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "variable '{name}' already added to datafile")
            }
            Self::EmptyName => write!(f, "variable name must not be empty"),
            Self::EmptyFilename => write!(f, "filename must not be empty"),
            Self::NoFilename => write!(f, "no default filename configured"),
            Self::UnknownFormat { name } => write!(f, "unknown data format '{name}'"),
            Self::OpenFailed { path, source } => {
                write!(f, "could not open '{}': {source}", path.display())
            }
            Self::InvalidHandle { path } => {
                write!(f, "backend handle for '{}' is not valid", path.display())
            }
            Self::CloseFailed { path, source } => {
                write!(f, "could not close '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatafileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OpenFailed { source, .. } | Self::CloseFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
