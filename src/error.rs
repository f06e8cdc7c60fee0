//! Error type shared by every loader and cache.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-success status.
    Status {
        status: u16,
        status_text: String,
        message: String,
    },
    /// The response body was not the JSON we expected.
    Parse(String),
    /// A record the load depends on does not exist.
    Missing(String),
    /// A cached value was read before any load completed.
    Uninitialized(&'static str),
    /// The operation is not supported by this container.
    Unsupported(&'static str),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "Network error: {}", msg),
            LoadError::Status { message, .. } => write!(f, "{}", message),
            LoadError::Parse(msg) => write!(f, "Couldn't parse JSON: {}", msg),
            LoadError::Missing(what) => write!(f, "Missing data: {}", what),
            LoadError::Uninitialized(what) => write!(f, "Uninitialized data used: {}", what),
            LoadError::Unsupported(what) => write!(f, "{} is not supported", what),
        }
    }
}

impl std::error::Error for LoadError {}
