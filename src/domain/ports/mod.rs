//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - `InferenceClient`: model discovery, generation and embedding against a local server
//!
//! These traits keep the retrieval pipeline independent of the concrete
//! inference backend.

pub mod inference;

pub use inference::InferenceClient;
