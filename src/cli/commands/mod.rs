//! Command handlers and the wiring they share.

pub mod ask;
pub mod chat;
pub mod models;
pub mod status;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::domain::models::{Config, IngestResponse};
use crate::domain::ports::InferenceClient;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::ollama::{OllamaClient, OllamaClientConfig};
use crate::services::{Orchestrator, OrchestratorConfig};

/// Load configuration from an explicit file or the layered defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Build the inference client for the configured endpoint
pub fn build_client(config: &Config) -> Result<Arc<dyn InferenceClient>> {
    let client = OllamaClient::new(OllamaClientConfig::from(config))
        .context("Failed to create inference client")?;
    Ok(Arc::new(client))
}

/// Build an orchestrator with an empty store
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let client = build_client(config)?;
    Orchestrator::new(client, OrchestratorConfig::from(config))
        .context("Failed to create orchestrator")
}

/// Read a plain-text document and load it into the orchestrator
pub async fn load_document(
    orchestrator: &Orchestrator,
    path: &Path,
    json: bool,
) -> Result<IngestResponse> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document {}", path.display()))?;

    let spinner = create_spinner(format!("Indexing {}...", path.display()), json);
    match orchestrator.ingest_text(&text).await {
        Ok(response) => {
            spinner.finish_success(format!(
                "Indexed {} chunk{}",
                response.chunk_count,
                if response.chunk_count == 1 { "" } else { "s" }
            ));
            Ok(response)
        }
        Err(e) => {
            spinner.finish_error("Indexing failed");
            Err(e.into())
        }
    }
}
