use std::fmt;
use std::path::PathBuf;

/// Result type for agstitch-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the corpus layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Record (de)serialization failed
    Record(agstitch_types::Error),

    /// Path is not a fragment file (wrong extension, no stem, etc.)
    NotAFragment(PathBuf),

    /// Refused to overwrite an existing file
    AlreadyExists(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Record(err) => write!(f, "Record error: {}", err),
            Error::NotAFragment(path) => {
                write!(f, "Not a session log file: {}", path.display())
            }
            Error::AlreadyExists(path) => {
                write!(f, "Refusing to overwrite existing file: {}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Record(err) => Some(err),
            Error::NotAFragment(_) | Error::AlreadyExists(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<agstitch_types::Error> for Error {
    fn from(err: agstitch_types::Error) -> Self {
        Error::Record(err)
    }
}
