//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Ollama-compatible inference client
//! - Chunking, embedding dispatch and the in-memory vector store
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod vector;
