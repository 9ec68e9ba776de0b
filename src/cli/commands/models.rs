use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::table::format_models_table;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ModelDiscovery, ModelInfo};

#[derive(Debug, Serialize)]
pub struct ModelsOutput {
    pub models: Vec<ModelInfo>,
    /// Model the selection policy would pick
    pub selected: Option<String>,
}

impl CommandOutput for ModelsOutput {
    fn to_human(&self) -> String {
        if self.models.is_empty() {
            return "No models installed.".to_string();
        }

        let selected = self
            .selected
            .as_deref()
            .map_or_else(|| "none usable".to_string(), str::to_string);
        format!(
            "{}\n\nSelected for generation: {selected}",
            format_models_table(&self.models, self.selected.as_deref())
        )
    }
}

/// Handle models command
pub async fn execute(config: &Config, json: bool) -> Result<()> {
    let client = super::build_client(config)?;

    let models = client
        .list_models()
        .await
        .context("Failed to list models")?;

    let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
    let selected = ModelDiscovery::select(&names, &config.model.preferred, &config.model.excluded)
        .model()
        .map(str::to_string);

    output(&ModelsOutput { models, selected }, json);
    Ok(())
}
