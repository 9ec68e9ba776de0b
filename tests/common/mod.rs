//! Common test utilities for integration tests
//!
//! Provides a deterministic inference stub and shared helpers used across
//! multiple integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use docent::domain::models::{ConnectionState, EmbeddingVector, ModelInfo};
use docent::{InferenceClient, RagResult};

/// Letters in a token prefix bucket
const PREFIX_LEN: usize = 3;

/// One dimension per possible three-letter prefix
pub const LEXICAL_DIMENSION: usize = 26 * 26 * 26;

/// Bucket index of a lowercase alphabetic token, by its first three letters
fn prefix_bucket(token: &str) -> usize {
    token
        .bytes()
        .chain(std::iter::repeat(b'a'))
        .take(PREFIX_LEN)
        .fold(0, |acc, b| acc * 26 + usize::from(b - b'a'))
}

/// Token-count vector over three-letter prefixes.
///
/// Cosine similarity of two such vectors grows with their lexical overlap,
/// and inflections sharing a stem ("sleep", "slept") land in one bucket.
pub fn lexical_embedding(text: &str) -> EmbeddingVector {
    let mut vector = vec![0.0; LEXICAL_DIMENSION];
    let lowered = text.to_lowercase();
    for token in lowered
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|t| !t.is_empty())
    {
        vector[prefix_bucket(token)] += 1.0;
    }
    vector
}

/// Deterministic inference client scoring lexical token overlap
#[derive(Default)]
pub struct LexicalClient {
    pub embed_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl LexicalClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for LexicalClient {
    fn endpoint(&self) -> &str {
        "stub://lexical"
    }

    async fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    async fn active_model(&self) -> Option<String> {
        Some("lexical".to_string())
    }

    async fn check_connection(&self) -> RagResult<String> {
        Ok("lexical".to_string())
    }

    async fn list_models(&self) -> RagResult<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            name: "lexical".to_string(),
            size: None,
        }])
    }

    async fn generate(&self, prompt: &str) -> RagResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(format!("answered from {} prompt bytes", prompt.len()))
    }

    async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
        self.embed_calls.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| lexical_embedding(t)).collect())
    }
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Body of a `GET /api/tags` response listing `names`
pub fn tags_body(names: &[&str]) -> String {
    let models: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "size": 1024 }))
        .collect();
    serde_json::json!({ "models": models }).to_string()
}
