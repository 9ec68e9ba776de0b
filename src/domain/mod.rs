//! Domain layer for Docent
//!
//! This module contains the document, conversation and connection models,
//! the error taxonomy, and the ports implemented by infrastructure adapters.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ErrorStatus, RagError, RagResult};
