//! Error types for edgepress

use thiserror::Error;

/// edgepress error type
#[derive(Error, Debug)]
pub enum Error {
    /// API key invalid or expired (HTTP 401)
    #[error("API key is invalid or has expired")]
    Auth,

    /// Service name already registered (HTTP 409)
    #[error("the name {0:?} is already registered; choose a different name")]
    Conflict(String),

    /// Remote validation rejected the service configuration
    #[error("service validation failed: {detail}")]
    Validation {
        /// Diagnostic payload reported by the validation endpoint, verbatim
        detail: String,
    },

    /// Site directory does not exist
    #[error("directory not found: {0}")]
    NotFound(String),

    /// Site root is a file, not a directory
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// An entry under the site root could not be read
    #[error("permission denied reading {0}")]
    Permission(String),

    /// Any other non-2xx response from the provisioning API
    #[error("API error ({status}): {detail}")]
    Remote {
        /// HTTP status code of the failing response
        status: u16,
        /// Response body, verbatim
        detail: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL construction error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True when the operator can fix the failure themselves (bad
    /// credential or name collision) rather than the remote platform.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Error::Auth | Error::Conflict(_))
    }

    /// The remote diagnostic payload, if this error carries one.
    pub fn remote_detail(&self) -> Option<&str> {
        match self {
            Error::Validation { detail } | Error::Remote { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Result type for edgepress operations
pub type Result<T> = std::result::Result<T, Error>;
