use std::fmt;

/// Result type for agstitch-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the record model
#[derive(Debug)]
pub enum Error {
    /// Line is not valid JSON
    Json(serde_json::Error),

    /// Line is valid JSON but not an object (carries the JSON kind found)
    NotAnObject(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::NotAnObject(kind) => write!(f, "Expected a JSON object, found {}", kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::NotAnObject(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
