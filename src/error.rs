use serde_json::Error as SerdeError;
use std::io;
use std::path::PathBuf;
use std::{error, fmt};

/// Error type for map/tileset decoding and renderer setup.
#[derive(Debug)]
pub enum Error {
    /// JSON parse error
    Parse(SerdeError),
    /// File I/O error for a specific path
    Io {
        /// The file that failed to read
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
    /// A map document's data length does not match width * height * 5,
    /// or the map dimensions are zero
    InvalidMapSize {
        /// Entry count implied by the declared dimensions
        expected: usize,
        /// Entry count actually present in `data`
        actual: usize,
    },
    /// No tileset with the requested id exists in the descriptor list
    UnknownTileset(i32),
    /// A tileset slot that already holds a texture was given a different one
    SlotReassigned {
        /// Index of the offending slot
        slot: usize,
    },
}

impl From<SerdeError> for Error {
    fn from(err: SerdeError) -> Self {
        Error::Parse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "JSON parse error: {}", e),
            Error::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            Error::InvalidMapSize { expected, actual } => write!(
                f,
                "Invalid map data size: expected {} entries, got {}",
                expected, actual
            ),
            Error::UnknownTileset(id) => write!(f, "No tileset with id {}", id),
            Error::SlotReassigned { slot } => {
                write!(f, "Reassignment of tileset slot {} is not supported", slot)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
