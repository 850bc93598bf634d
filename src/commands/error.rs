//! Command error taxonomy.
//!
//! Every failure a dispatched command can produce, in the shape the response
//! envelope reports it. No error is retried inside the bridge; retry policy
//! belongs to the remote client and only to idempotent reads.

use thiserror::Error;

use crate::model::{ReorderError, ResolveError, Violation};

/// Result of dispatching one command.
pub type CommandResult = Result<serde_json::Value, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Named entity absent at the expected scope.
    #[error("{kind} not found: '{name}' in {scope}")]
    NotFound {
        kind: &'static str,
        name: String,
        scope: String,
    },

    /// Name matched under multiple owners and no owner hint was given.
    #[error("'{name}' is ambiguous; candidates: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    /// One or more rule violations; the complete list in one response.
    #[error("validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// Reorder position outside `[0, count)`.
    #[error("position {position} is out of bounds for a list of {count} elements")]
    Bounds { position: i64, count: usize },

    /// Request arguments did not match the command's declared shape.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    /// Unexpected failure; logged at the handler boundary and converted to
    /// a generic failure response.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable kind carried in the `error` envelope field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Ambiguous { .. } => "ambiguous",
            Self::Validation(_) => "validation_failed",
            Self::Bounds { .. } => "bounds_error",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ResolveError> for CommandError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { kind, name, scope } => Self::NotFound { kind, name, scope },
            ResolveError::Ambiguous { name, candidates } => Self::Ambiguous { name, candidates },
        }
    }
}

impl From<ReorderError> for CommandError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::NotFound { name } => Self::NotFound {
                kind: "element",
                name,
                scope: "list".to_string(),
            },
            ReorderError::OutOfBounds { position, count } => Self::Bounds { position, count },
        }
    }
}

impl From<Vec<Violation>> for CommandError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }
}
