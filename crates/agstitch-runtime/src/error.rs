use std::fmt;
use std::path::PathBuf;

/// Result type for agstitch-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Unusable request: unknown session, ambiguous prefix, too few sources
    Input(String),

    /// Merge target already exists
    Conflict(PathBuf),

    /// Corpus layer error
    Provider(agstitch_providers::Error),

    /// Session catalog error
    Index(agstitch_index::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Input(msg) => write!(f, "{}", msg),
            Error::Conflict(path) => {
                write!(f, "Merge target already exists: {}", path.display())
            }
            Error::Provider(err) => write!(f, "{}", err),
            Error::Index(err) => write!(f, "Index error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Provider(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Input(_) | Error::Conflict(_) | Error::Config(_) => None,
        }
    }
}

impl From<agstitch_providers::Error> for Error {
    fn from(err: agstitch_providers::Error) -> Self {
        match err {
            agstitch_providers::Error::AlreadyExists(path) => Error::Conflict(path),
            other => Error::Provider(other),
        }
    }
}

impl From<agstitch_index::Error> for Error {
    fn from(err: agstitch_index::Error) -> Self {
        Error::Index(err)
    }
}

impl From<agstitch_core::Error> for Error {
    fn from(err: agstitch_core::Error) -> Self {
        match err {
            agstitch_core::Error::Io(err) => Error::Io(err),
            agstitch_core::Error::Config(msg) => Error::Config(msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
