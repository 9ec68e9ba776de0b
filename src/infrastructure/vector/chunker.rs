//! Text chunking implementation
//!
//! Splits extracted document text into fixed-size, overlapping character
//! windows. Operates on Unicode scalar values so multi-byte text is never cut
//! mid-character.

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, ChunkingConfig};

/// Sliding-window text chunker
///
/// Deterministic for identical input and configuration. The windows cover
/// the whole input with no gaps, consecutive windows share exactly
/// `chunk_overlap` characters, and the last window may be shorter than
/// `chunk_size` but is always emitted.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker with default configuration
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Create a new chunker with custom configuration
    pub fn with_config(config: ChunkingConfig) -> RagResult<Self> {
        config
            .validate()
            .map_err(|e| RagError::Config(format!("Invalid chunking config: {e}")))?;

        Ok(Self { config })
    }

    /// Active configuration
    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk text into ordered windows; ids are assigned 0, 1, 2, ...
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary, including the end of the text
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = boundaries.len() - 1;

        let stride = self.config.stride();
        let mut chunks = Vec::with_capacity(total_chars.div_ceil(stride));
        let mut start = 0;

        loop {
            let end = (start + self.config.chunk_size).min(total_chars);
            let content = &text[boundaries[start]..boundaries[end]];

            chunks.push(Chunk::new(chunks.len(), content).with_span(start, end));

            if end >= total_chars {
                break;
            }

            start += stride;
        }

        tracing::debug!(
            total_chars,
            chunk_count = chunks.len(),
            chunk_size = self.config.chunk_size,
            chunk_overlap = self.config.chunk_overlap,
            "chunked text"
        );

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}
