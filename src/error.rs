//! Error types for slotalign.
//!
//! Matching never fails: an unrealized slot is `None`, not an error.
//! Errors only surface while loading resources and configuration.

use thiserror::Error;

/// Result type for slotalign operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slotalign operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed JSON resource, corpus line, or MR).
    #[error("Parse error: {0}")]
    Parse(String),

    /// A resource file (lexicon, mention table, policy) could not be found.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Inconsistent aligner configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the shared data model.
    #[error(transparent)]
    Core(#[from] slotalign_core::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a resource-not-found error.
    pub fn resource_not_found(what: impl Into<String>) -> Self {
        Error::ResourceNotFound(what.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
