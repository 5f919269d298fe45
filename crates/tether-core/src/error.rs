//! Error types for tether-core

use thiserror::Error;

/// Result type alias for tether-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing, resolving or invoking connectors
#[derive(Error, Debug)]
pub enum Error {
    /// Input payload is missing a required field or has the wrong shape
    #[error("invalid input for '{operation}': {message}")]
    Binding {
        /// Operation that rejected the input
        operation: String,
        /// Description of what's wrong
        message: String,
    },

    /// A declared precondition (usually auth material) is not met
    #[error("precondition failed for '{operation}': {message}")]
    Precondition {
        /// Operation whose precondition failed
        operation: String,
        /// Description of the missing precondition
        message: String,
    },

    /// An external dependency (HTTP call, script engine) failed
    #[error("'{operation}' failed: {message}")]
    Upstream {
        /// Operation that called the dependency
        operation: String,
        /// Error reported by the dependency
        message: String,
    },

    /// Unknown integration, action or trigger identifier
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What was looked up (integration, action, trigger)
        kind: &'static str,
        /// Identifier that has no match
        name: String,
    },

    /// Failed to parse a bundled integration descriptor
    #[error("failed to parse descriptor: {0}")]
    Descriptor(#[from] serde_yaml::Error),

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`], used by callers that apply policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input
    Binding,
    /// Missing auth material or other unmet precondition
    Precondition,
    /// Failure reported by an external dependency
    Upstream,
    /// Lookup failure in a registry or the harness
    NotFound,
    /// Descriptor, configuration, IO or serialization failure
    Internal,
}

impl Error {
    /// Build a binding error for `operation`
    pub fn binding(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Binding {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build a precondition error for `operation`
    pub fn precondition(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Precondition {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build an upstream error for `operation`
    pub fn upstream(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Upstream {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Build a lookup error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Binding { .. } => ErrorKind::Binding,
            Self::Precondition { .. } => ErrorKind::Precondition,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Descriptor(_)
            | Self::ConfigNotFound { .. }
            | Self::ConfigInvalid { .. }
            | Self::Io(_)
            | Self::Json(_) => ErrorKind::Internal,
        }
    }

    /// Whether a caller may reasonably retry the failed call
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}
