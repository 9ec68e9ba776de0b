//! Vector infrastructure components
//!
//! Text chunking, embedding dispatch, the in-memory document store, and
//! cosine-similarity ranking used for retrieval.

pub mod chunker;
pub mod document_store;
pub mod embedding_dispatcher;
pub mod retriever;

pub use chunker::Chunker;
pub use document_store::DocumentStore;
pub use embedding_dispatcher::EmbeddingDispatcher;
pub use retriever::{cosine_similarity, rank, ScoredChunk};
