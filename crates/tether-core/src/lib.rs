//! Tether Core Library
//!
//! This crate provides the contract every connector implements and the
//! machinery around it:
//! - Operation descriptors and typed input schemas
//! - Execution context (auth, step state, step identity)
//! - Typed input binding
//! - Integration registries and the process catalog
//! - The `Spider` test harness
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│ Integration │────▶│ Action or   │────▶│   Result    │
//! │  (lookup)   │     │  Registry   │     │  Trigger    │     │ (JSON map)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                               ▲
//!                                   ExecutionContext + InputBinder
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::{Catalog, ExecutionContext, Spider};
//!
//! let mut catalog = Catalog::new();
//! catalog.register(my_integration());
//!
//! let spider = Spider::new(my_integration());
//! let ctx = spider.context_for(serde_json::json!({"content": "a,b\n1,2"}));
//! let output = spider.run_operation("row_count", &ctx).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod harness;
pub mod integration;
pub mod operation;
pub mod schema;

pub use binder::{BindMode, InputBinder};
pub use catalog::{Catalog, RegistrationHandle};
pub use config::{Config, ProjectConfig, RuntimeConfig};
pub use context::{AuthContext, ExecutionContext, StepMetadata, StepState, StepStatus};
pub use error::{Error, ErrorKind, Result};
pub use harness::Spider;
pub use integration::{
    AuthKind, AuthRequirement, Integration, IntegrationMetadata, IntegrationRegistry,
};
pub use operation::{Action, Output, Trigger, Unit, to_output};
pub use schema::{ErrorPolicy, FieldDescriptor, FieldKind, InputSchema, OperationInfo};
