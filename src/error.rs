//! Error types for xml2class
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using xml2class Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xml2class operations
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error, reported by the underlying parser
    #[error("XML error: {0}")]
    Xml(String),

    /// The event stream produced no element at all
    #[error("document has no root element")]
    NoRoot,

    /// Unbalanced open/close events fed to the tree builder
    #[error("tree error: {0}")]
    Tree(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
