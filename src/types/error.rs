//! Error taxonomy for import and persistence
//!
//! Operations addressing a date with no record return `Option::None`
//! instead of an error; callers treat that as a silent no-op.

use std::fmt;
use std::io;

/// Why an import could not produce a `ParsedConversation`
#[derive(Debug)]
pub enum ImportError {
    /// Archive contained no readable text member; the user should
    /// re-export the conversation as plain text
    Extraction(String),
    /// Generic read/decode failure
    Decode(io::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Extraction(name) => {
                write!(f, "no readable text in archive: {}", name)
            }
            ImportError::Decode(err) => write!(f, "could not read file: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Extraction(_) => None,
            ImportError::Decode(err) => Some(err),
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(err: io::Error) -> Self {
        ImportError::Decode(err)
    }
}

/// Persistence failure; callers surface it as "could not save, try again"
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage I/O failed: {}", err),
            StorageError::Serialize(err) => write!(f, "storage (de)serialization failed: {}", err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialize(err)
    }
}
