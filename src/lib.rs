//! Docent - document question answering over a local model
//!
//! Docent answers questions about a document with retrieval-augmented
//! generation against a local Ollama-compatible inference server: the text is
//! split into overlapping chunks, each chunk is embedded, the chunks closest
//! to a question are retrieved by cosine similarity, and the model answers
//! from them.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the inference port
//! - **Service Layer** (`services`): prompt assembly, orchestration, sessions
//! - **Infrastructure Layer** (`infrastructure`): inference client, vector
//!   store, configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use docent::infrastructure::ollama::{OllamaClient, OllamaClientConfig};
//! use docent::{Orchestrator, OrchestratorConfig, QueryRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(OllamaClient::new(OllamaClientConfig::default())?);
//! let orchestrator = Orchestrator::new(client, OrchestratorConfig::default())?;
//!
//! orchestrator.ingest_text("The cat slept on the mat.").await?;
//! let answer = orchestrator.query(QueryRequest::document("Where did the cat sleep?")).await?;
//! println!("{}", answer.response);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ErrorStatus, RagError, RagResult};
pub use domain::models::{
    ChatState, Chunk, ChunkingConfig, Config, ConnectionState, ConversationMessage,
    IngestRequest, IngestResponse, ModelDiscovery, ModelInfo, QueryRequest, QueryResponse, Role,
};
pub use domain::ports::InferenceClient;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Orchestrator, OrchestratorConfig, SessionRegistry};
