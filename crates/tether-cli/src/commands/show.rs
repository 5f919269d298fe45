//! Show integration command

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tether_core::OperationInfo;

fn describe(id: &str, info: &OperationInfo) -> Result<Value> {
    let mut value = serde_json::to_value(info)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), Value::String(id.to_string()));
    }
    Ok(value)
}

/// Run the show command
pub async fn run(config_path: &str, integration: &str) -> Result<()> {
    let (_, catalog) = super::load_catalog(config_path)?;
    let registry = catalog
        .integration(integration)
        .with_context(|| format!("Unknown integration '{}'", integration))?;

    let actions = registry
        .actions()
        .iter()
        .map(|a| describe(a.id(), a.info()))
        .collect::<Result<Vec<_>>>()?;
    let triggers = registry
        .triggers()
        .iter()
        .map(|t| describe(t.id(), t.info()))
        .collect::<Result<Vec<_>>>()?;

    let document = json!({
        "id": registry.id(),
        "metadata": registry.metadata(),
        "auth": registry.auth(),
        "actions": actions,
        "triggers": triggers,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
