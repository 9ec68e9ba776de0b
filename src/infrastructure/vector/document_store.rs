//! In-memory document store
//!
//! Holds the `(chunk, embedding)` pairs of one active corpus and answers
//! similarity queries against them. Mutations take the write half of the
//! lock and searches the read half, so a search never observes a half-cleared
//! or half-populated corpus.

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::embedding_dispatcher::EmbeddingDispatcher;
use super::retriever::{rank, ScoredChunk};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, EmbeddingVector};

#[derive(Debug, Default)]
struct Entries {
    chunks: Vec<Chunk>,
    vectors: Vec<EmbeddingVector>,
}

impl Entries {
    fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }
}

/// Ordered collection of chunk/embedding pairs for a single corpus
pub struct DocumentStore {
    entries: RwLock<Entries>,
    dispatcher: EmbeddingDispatcher,
}

impl DocumentStore {
    /// Create an empty store that embeds through `dispatcher`
    pub fn new(dispatcher: EmbeddingDispatcher) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            dispatcher,
        }
    }

    /// Embed `chunks` and append them in input order.
    ///
    /// Every vector must share the dimensionality of the vectors already
    /// stored. Nothing is appended if any embedding fails.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn add_documents(&self, chunks: Vec<Chunk>) -> RagResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.dispatcher.embed_all(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding {
                status: None,
                message: format!(
                    "expected {} embeddings, received {}",
                    chunks.len(),
                    vectors.len()
                ),
            });
        }

        let mut entries = self.entries.write().await;

        let expected = entries.dimension().unwrap_or(vectors[0].len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(RagError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let added = chunks.len();
        entries.chunks.extend(chunks);
        entries.vectors.extend(vectors);

        info!(added, total = entries.chunks.len(), dimension = expected, "documents added");
        Ok(added)
    }

    /// Top `k` chunks with their cosine similarity to `query`.
    ///
    /// An empty store returns an empty result without touching the client.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn similarity_search_scored(&self, query: &str, k: usize) -> RagResult<Vec<ScoredChunk>> {
        if self.is_empty().await {
            debug!("similarity search on empty store");
            return Ok(Vec::new());
        }

        let query_vector = self.dispatcher.embed_query(query).await?;

        let entries = self.entries.read().await;
        if let Some(expected) = entries.dimension() {
            if query_vector.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                });
            }
        }

        let pairs = entries
            .chunks
            .iter()
            .zip(entries.vectors.iter().map(Vec::as_slice));
        let results = rank(&query_vector, pairs, k);

        debug!(
            k,
            returned = results.len(),
            top_score = results.first().map(|r| r.score),
            "similarity search complete"
        );
        Ok(results)
    }

    /// Text of the top `k` chunks, best first.
    pub async fn similarity_search(&self, query: &str, k: usize) -> RagResult<Vec<String>> {
        Ok(self
            .similarity_search_scored(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.chunk.text)
            .collect())
    }

    /// Drop every stored pair.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let removed = entries.chunks.len();
        entries.chunks.clear();
        entries.vectors.clear();
        debug!(removed, "document store cleared");
    }

    /// Number of stored chunks
    pub async fn len(&self) -> usize {
        self.entries.read().await.chunks.len()
    }

    /// Whether the store holds no chunks
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.chunks.is_empty()
    }

    /// Embedding dimensionality of the corpus, if any chunk is stored
    pub async fn dimension(&self) -> Option<usize> {
        self.entries.read().await.dimension()
    }

    /// Snapshot of the stored chunks in insertion order
    pub async fn chunks(&self) -> Vec<Chunk> {
        self.entries.read().await.chunks.clone()
    }
}
