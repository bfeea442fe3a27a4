//! Error types for rollbook.
//!
//! Every failure in the crate is an [`Error`]. At the HTTP boundary errors are
//! collapsed into an [`ErrorKind`], so storage-specific details never reach a
//! caller in their native shape.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for rollbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The store lock was poisoned by a panicking request.
    #[error("record store is unavailable: lock poisoned")]
    StorePoisoned,

    // === Record Errors ===
    /// Student fields failed structural validation.
    #[error("invalid student: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A student identifier could not be parsed.
    #[error("invalid student id: {id}")]
    InvalidId {
        /// The identifier as received.
        id: String,
    },

    /// No student exists with the given identifier.
    #[error("student not found: {id}")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    // === Transport Errors ===
    /// A request came from an origin outside the allow-list.
    #[error("origin not allowed: {origin}")]
    OriginForbidden {
        /// The rejected `Origin` header value.
        origin: String,
    },

    /// The HTTP client failed to reach the service or decode its reply.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error body.
    #[error("service returned {status} ({kind}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error kind reported by the service.
        kind: ErrorKind,
        /// Message reported by the service.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for rollbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// Coarse error classification exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request was structurally invalid.
    #[serde(rename = "validation_error")]
    Validation,
    /// The addressed record does not exist.
    #[serde(rename = "not_found")]
    NotFound,
    /// The record store could not serve the request.
    #[serde(rename = "store_unavailable")]
    StoreUnavailable,
    /// The request origin is not on the allow-list.
    #[serde(rename = "forbidden")]
    Forbidden,
    /// Anything else.
    #[serde(rename = "internal")]
    Internal,
}

impl ErrorKind {
    /// The wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::StoreUnavailable => "store_unavailable",
            Self::Forbidden => "forbidden",
            Self::Internal => "internal",
        }
    }

    /// The HTTP status code used for this kind.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Internal => 500,
            Self::StoreUnavailable => 503,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify this error for the HTTP boundary.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::InvalidId { .. } | Self::Json(_) => {
                ErrorKind::Validation
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DatabaseOpen { .. }
            | Self::DatabaseQuery(_)
            | Self::DatabaseMigration { .. }
            | Self::StorePoisoned => ErrorKind::StoreUnavailable,
            Self::OriginForbidden { .. } => ErrorKind::Forbidden,
            Self::Api { kind, .. } => *kind,
            _ => ErrorKind::Internal,
        }
    }

    /// Check if this error means the record was absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
