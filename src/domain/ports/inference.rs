//! Inference port for text generation and embedding.
//!
//! Defines the contract the orchestrator and document store rely on. The
//! production adapter talks to a local Ollama-compatible server; tests plug
//! in deterministic stubs.

use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::{ConnectionState, EmbeddingVector, ModelInfo};

/// Trait for clients of a local inference endpoint.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Endpoint identifier for diagnostics (usually the base URL).
    fn endpoint(&self) -> &str;

    /// Current connection state. Never triggers a network call.
    async fn connection_state(&self) -> ConnectionState;

    /// Model selected by the last successful connection check.
    async fn active_model(&self) -> Option<String>;

    /// Ensure a model is selected.
    ///
    /// Returns immediately when already connected; otherwise queries the
    /// endpoint's model listing with bounded retries. Returns the selected
    /// model name.
    async fn check_connection(&self) -> RagResult<String>;

    /// Models advertised by the endpoint (single call, no retries).
    async fn list_models(&self) -> RagResult<Vec<ModelInfo>>;

    /// Generate a completion for `prompt` (non-streaming).
    async fn generate(&self, prompt: &str) -> RagResult<String>;

    /// Embed every text, one upstream call per text, in input order.
    ///
    /// Fails on the first failing call; no partial results are returned.
    async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>>;
}
