pub mod chunking;
pub mod config;
pub mod connection;
pub mod conversation;
pub mod session;

pub use chunking::{Chunk, ChunkSpan, ChunkingConfig};
pub use config::{
    Config, EmbeddingConfig, EndpointConfig, LoggingConfig, ModelConfig, RetrievalConfig,
    RetryConfig,
};
pub use connection::{ConnectionState, ModelDiscovery, ModelInfo};
pub use conversation::{
    ConversationMessage, IngestRequest, IngestResponse, QueryRequest, QueryResponse, Role,
};
pub use session::ChatState;

/// A fixed-length embedding vector; its length is set by the active model.
pub type EmbeddingVector = Vec<f32>;
