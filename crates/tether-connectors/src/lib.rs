//! Tether Connectors
//!
//! Reference integrations built on the `tether-core` contract:
//!
//! | id        | actions                    | triggers  |
//! |-----------|----------------------------|-----------|
//! | `manual`  |                            | `trigger` |
//! | `csv`     | `row_count`, `to_json`     |           |
//! | `script`  | `template`, `regex_extract`|           |
//! | `webhook` | `send`                     | `catch`   |
//!
//! Each integration bundles an `integration.yaml` descriptor and a
//! `README.md` that are embedded at compile time and parsed when the
//! integration is constructed.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = std::sync::Arc::new(tether_connectors::catalog()?);
//! let unit = catalog.resolve("csv", "row_count")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod csv_file;
pub mod manual;
pub mod script;
pub mod webhook;

use tether_core::{Catalog, Result};

pub use csv_file::CsvIntegration;
pub use manual::ManualIntegration;
pub use script::ScriptIntegration;
pub use webhook::WebhookIntegration;

/// Register every bundled integration into `catalog`
pub fn register_all(catalog: &mut Catalog) -> Result<()> {
    catalog.register(ManualIntegration::new()?);
    catalog.register(CsvIntegration::new()?);
    catalog.register(ScriptIntegration::new()?);
    catalog.register(WebhookIntegration::new()?);
    Ok(())
}

/// A catalog holding every bundled integration
pub fn catalog() -> Result<Catalog> {
    let mut catalog = Catalog::new();
    register_all(&mut catalog)?;
    Ok(catalog)
}
