//! List integrations command

use anyhow::Result;

/// Run the list command
pub async fn run(config_path: &str) -> Result<()> {
    let (_, catalog) = super::load_catalog(config_path)?;

    for registry in catalog.integrations() {
        let metadata = registry.metadata();
        println!(
            "{:<10} {:<10} {:<10} {} actions, {} triggers{}",
            registry.id(),
            metadata.display_name,
            metadata.version,
            registry.actions().len(),
            registry.triggers().len(),
            if registry.requires_auth() { " (auth)" } else { "" }
        );
    }

    tracing::debug!(integrations = catalog.len(), "listed integrations");
    Ok(())
}
