//! Request and response types for the Ollama-compatible HTTP API

use serde::{Deserialize, Serialize};

use crate::domain::models::ModelInfo;

/// Response of `GET /api/tags`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    /// Installed models
    #[serde(default)]
    pub models: Vec<TagModel>,
}

/// One entry of the model listing
#[derive(Debug, Clone, Deserialize)]
pub struct TagModel {
    /// Model name including tag
    pub name: String,

    /// Size on disk in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

impl From<TagModel> for ModelInfo {
    fn from(model: TagModel) -> Self {
        Self {
            name: model.name,
            size: model.size,
        }
    }
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    /// Model to run
    pub model: &'a str,
    /// Full prompt text
    pub prompt: &'a str,
    /// Always false: the whole answer is returned in one response
    pub stream: bool,
}

/// Response of `POST /api/generate` with streaming disabled
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub response: String,
}

/// Body of `POST /api/embeddings`
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingsRequest<'a> {
    /// Embedding model
    pub model: &'a str,
    /// Single text to embed
    pub prompt: &'a str,
}

/// Response of `POST /api/embeddings`
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsResponse {
    /// The embedding vector
    #[serde(default)]
    pub embedding: Vec<f32>,
}
