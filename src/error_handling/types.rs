//! Error type definitions.
//!
//! This module defines all error types used throughout the application, from
//! startup (configuration, logger) down to the per-phase failures of an import.

use log::SetLoggerError;
use thiserror::Error;

use crate::event::ObjectLocation;

/// Error types for startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The required table identifier is not configured.
    #[error("{0} must be set to the target table name")]
    MissingTable(&'static str),

    /// An optional setting is present but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Environment variable name
        name: &'static str,
        /// Offending raw value
        value: String,
    },

    /// Batch size outside the range accepted by the table service.
    #[error("batch size must be between 1 and 25, got {0}")]
    BatchSizeOutOfRange(usize),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error opening or migrating the local SQLite table.
    #[error("Database initialization error: {0}")]
    DatabaseError(String),
}

/// Kind of object storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The bucket or key does not exist.
    NotFound,
    /// Access to the object was denied.
    Forbidden,
    /// The service could not be reached or returned a server-side error.
    Unavailable,
    /// The object was retrieved but the transient copy could not be written or read.
    Io,
}

/// Error returned by an [`crate::fetch::ObjectStore`].
#[derive(Error, Debug)]
#[error("{kind:?}: {message}")]
pub struct ObjectStoreError {
    /// Failure classification
    pub kind: FetchFailureKind,
    /// Human-readable detail from the storage client
    pub message: String,
}

impl ObjectStoreError {
    /// Creates an error of the given kind.
    pub fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchFailureKind::NotFound, message)
    }
}

impl From<std::io::Error> for ObjectStoreError {
    fn from(e: std::io::Error) -> Self {
        let kind = match e.kind() {
            std::io::ErrorKind::NotFound => FetchFailureKind::NotFound,
            std::io::ErrorKind::PermissionDenied => FetchFailureKind::Forbidden,
            _ => FetchFailureKind::Io,
        };
        Self::new(kind, e.to_string())
    }
}

/// Result of a failed canonicalization.
///
/// Callers decide between skip-and-continue and abort with
/// [`CanonicalizeError::is_skippable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// The hostname does not end in a listed public suffix, or is a bare suffix.
    #[error("{0} is not using a valid public suffix")]
    UnrecognizedDomain(String),

    /// Any other failure to resolve the hostname.
    #[error("failed to resolve {hostname}: {reason}")]
    Resolution {
        /// Candidate that could not be resolved
        hostname: String,
        /// Underlying cause
        reason: String,
    },
}

impl CanonicalizeError {
    /// Returns true when the candidate should be dropped and processing continued.
    pub fn is_skippable(&self) -> bool {
        matches!(self, CanonicalizeError::UnrecognizedDomain(_))
    }
}

/// Error returned by a [`crate::storage::DomainTable`] write.
#[derive(Error, Debug)]
pub enum TableError {
    /// The table rejected a specific item.
    #[error("write rejected for {domain}: {message}")]
    ItemRejected {
        /// Domain whose write failed
        domain: String,
        /// Detail from the table client
        message: String,
    },

    /// Items still unprocessed after resubmission.
    #[error("{} item(s) left unprocessed: {}", .domains.len(), .domains.join(", "))]
    Unprocessed {
        /// Domains that were never acknowledged
        domains: Vec<String>,
    },

    /// The batch request as a whole failed.
    #[error("table request failed: {0}")]
    Request(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Fatal errors that abort an import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The trigger payload could not be interpreted.
    #[error("invalid trigger event: {0}")]
    InvalidEvent(String),

    /// The source object could not be downloaded or read.
    #[error("failed to fetch {location}: {source}")]
    ObjectFetch {
        /// Object being imported
        location: ObjectLocation,
        /// Storage failure
        #[source]
        source: ObjectStoreError,
    },

    /// A candidate hostname failed for a reason other than an unknown suffix.
    #[error("domain resolution failed: {0}")]
    DomainResolution(#[source] CanonicalizeError),

    /// A table write failed.
    #[error("write of batch {batch} failed: {source}")]
    PersistenceWrite {
        /// 1-based batch number
        batch: usize,
        /// Table failure
        #[source]
        source: TableError,
    },
}

impl ImportError {
    /// Short machine-readable label, used in structured logs and Lambda error types.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::InvalidEvent(_) => "InvalidEvent",
            ImportError::ObjectFetch { .. } => "ObjectFetchError",
            ImportError::DomainResolution(_) => "DomainResolutionError",
            ImportError::PersistenceWrite { .. } => "PersistenceWriteError",
        }
    }
}
