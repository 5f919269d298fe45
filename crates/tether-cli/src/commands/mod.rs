//! CLI command implementations

pub mod list;
pub mod run;
pub mod show;
pub mod validate;

use anyhow::{Context, Result};
use tether_core::{Catalog, Config};

/// Load the project configuration and the catalog it exposes
///
/// A missing configuration file falls back to defaults, which expose every
/// bundled integration.
pub(crate) fn load_catalog(config_path: &str) -> Result<(Config, Catalog)> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let mut catalog =
        tether_connectors::catalog().context("Failed to register bundled integrations")?;
    catalog.retain_only(&config.project.integrations);
    Ok((config, catalog))
}
