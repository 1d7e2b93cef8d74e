//! Error types for dataset loading and query execution.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// The three entity tables a query can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Action,
    ArnType,
    ConditionKey,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Action => "action",
            Self::ArnType => "ARN type",
            Self::ConditionKey => "condition key",
        };
        f.write_str(label)
    }
}

/// Errors produced while loading the reference corpus or answering a query.
///
/// Every error is terminal for the query that raised it. `UnknownService` and
/// `UnknownName` echo the caller's input verbatim so the boundary layer can
/// surface them unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Access-level token outside `read`, `write`, `list`, `tagging`, `permissions-management`.
    #[error("Invalid access level '{0}': expected one of read, write, list, tagging, permissions-management")]
    InvalidAccessLevel(String),

    /// The requested service has no entries in the dataset.
    #[error("Unknown service '{0}'")]
    UnknownService(String),

    /// The requested name does not exist within an otherwise known service.
    #[error("Unknown {kind} '{name}' for service '{service}'")]
    UnknownName {
        kind: EntityKind,
        service: String,
        name: String,
    },

    /// The reference corpus could not be loaded.
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// More than one mutually exclusive filter was supplied.
    #[error("Conflicting filters: {0}")]
    ConflictingFilters(String),
}

impl QueryError {
    pub(crate) fn unknown_name(
        kind: EntityKind,
        service: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::UnknownName {
            kind,
            service: service.into(),
            name: name.into(),
        }
    }

    pub(crate) fn dataset_io(operation: &str, path: impl AsRef<Path>, error: impl fmt::Display) -> Self {
        Self::DatasetUnavailable(format!(
            "failed to {} '{}': {}",
            operation,
            path.as_ref().display(),
            error
        ))
    }

    pub(crate) fn dataset_parse(origin: &str, error: &serde_json::Error) -> Self {
        Self::DatasetUnavailable(format!(
            "JSON parsing error in {} at line {}, column {}: {}",
            origin,
            error.line(),
            error.column(),
            error
        ))
    }

    pub(crate) fn integrity(service: &str, message: impl fmt::Display) -> Self {
        Self::DatasetUnavailable(format!("service '{}': {}", service, message))
    }

    pub(crate) fn conflicting(message: impl Into<String>) -> Self {
        Self::ConflictingFilters(message.into())
    }

    /// Whether the caller can fix this error by changing the request.
    ///
    /// `DatasetUnavailable` is operational and aborts the invocation; every other
    /// kind is a rejected or unmatched request.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::DatasetUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
