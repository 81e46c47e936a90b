//! Error types for PDF Reader MCP Server

use thiserror::Error;

/// Result type alias for PDF Reader MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF Reader MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// Path does not resolve to an existing file
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Path does not carry the `.pdf` extension
    #[error("File must have .pdf extension: {path}")]
    InvalidExtension { path: String },

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },

    /// File exceeds the configured size ceiling
    #[error("File too large: {size_mb:.2} MB (maximum: {max_mb} MB)")]
    TooLarge { size_mb: f64, max_mb: u64 },

    /// Reading or parsing the document failed
    #[error("Failed to read PDF: {reason}")]
    LoadFailure { reason: String },

    /// Malformed search input
    #[error("Invalid search query: {reason}")]
    InvalidQuery { reason: String },

    /// Invalid page range
    #[error("Invalid page range: {range}")]
    InvalidPageRange { range: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message returned to the calling client.
    ///
    /// Unlike a multi-tenant server, the caller here is the local user who
    /// supplied the path, so paths and parser messages are passed through.
    /// The one exception is sandbox denials, which do not echo the path.
    pub fn client_message(&self) -> String {
        match self {
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
            Error::Io(e) => format!("Failed to read PDF: {}", e),
            other => other.to_string(),
        }
    }

    pub(crate) fn load_failure(reason: impl std::fmt::Display) -> Self {
        Error::LoadFailure {
            reason: reason.to_string(),
        }
    }
}
