//! Validate configuration command

use anyhow::{Context, Result, bail};
use tether_core::Config;

/// Run the validate command
pub async fn run(config_path: &str) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let mut catalog =
        tether_connectors::catalog().context("Failed to register bundled integrations")?;

    let mut problems: Vec<String> = config
        .project
        .integrations
        .iter()
        .filter(|id| catalog.integration(id).is_err())
        .map(|id| format!("configuration: unknown integration '{}'", id))
        .collect();

    catalog.retain_only(&config.project.integrations);
    problems.extend(catalog.validate());

    println!("Project: {} {}", config.project.name, config.project.version);
    println!("Integrations: {}", catalog.len());

    if !problems.is_empty() {
        for problem in &problems {
            println!("✗ {}", problem);
        }
        bail!("Validation found {} problem(s)", problems.len());
    }

    println!("✓ Configuration is valid");
    Ok(())
}
