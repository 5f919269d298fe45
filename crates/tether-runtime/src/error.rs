//! Runtime error types

/// Result type for runtime operations
pub type Result<T> = anyhow::Result<T>;

/// Runtime error (re-export anyhow for application-level errors)
///
/// Unit failures are not errors at this level; they are reported through
/// [`crate::StepOutcome`]. Only resolution failures surface here.
pub type Error = anyhow::Error;
