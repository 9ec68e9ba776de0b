//! Text chunking domain models
//!
//! Models for splitting extracted document text into overlapping windows.
//! Window sizes and offsets are measured in characters (Unicode scalar values).

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

const fn default_chunk_size() -> usize {
    1000
}

const fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with explicit window and overlap.
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        Ok(())
    }

    /// Distance between the starts of consecutive chunks.
    pub const fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Character range `[start, end)` a chunk covers in its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// First character (inclusive)
    pub start: usize,
    /// Last character (exclusive)
    pub end: usize,
}

/// A bounded span of document text, the unit of retrieval.
///
/// Immutable once created; `id` is the ingestion sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in ingestion order (0-based)
    pub id: usize,

    /// The text content of this chunk
    pub text: String,

    /// Source range, when the chunk was produced by the chunker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<ChunkSpan>,
}

impl Chunk {
    /// Create a chunk without source offsets.
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            span: None,
        }
    }

    /// Attach the source range.
    #[must_use]
    pub const fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some(ChunkSpan { start, end });
        self
    }
}
