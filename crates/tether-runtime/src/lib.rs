//! Tether Runtime
//!
//! This crate executes single workflow steps against a [`tether_core::Catalog`].
//! It is the piece a workflow engine calls once per step.
//!
//! # Features
//!
//! - Unit resolution by integration and operation identifier
//! - Per-attempt timeouts and retries driven by each unit's error policy
//! - Step state bookkeeping (status, output, timestamps)
//!
//! # Usage
//!
//! ```rust,ignore
//! use tether_runtime::{Runner, RunnerConfig, StepJob};
//!
//! let runner = Runner::new(Arc::new(catalog), RunnerConfig::default());
//! let outcome = runner
//!     .execute_step(StepJob::new("csv", "row_count").with_input(json!({"content": "a\n1"})))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod jobs;

pub use engine::{Runner, RunnerConfig, StepOutcome};
pub use error::{Error, Result};
pub use jobs::{JobMetadata, StepJob};
