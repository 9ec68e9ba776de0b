//! Ollama-compatible inference client
//!
//! Model discovery with bounded retries, non-streaming generation, and
//! per-text embedding against a local inference server.

pub mod client;
pub mod retry;
pub mod types;

pub use client::{OllamaClient, OllamaClientConfig};
pub use retry::{RetryExhausted, RetryPolicy};
