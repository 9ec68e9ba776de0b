//! Chat orchestrator
//!
//! Combines retrieval output, caller-supplied history and the mode flag into
//! a prompt, invokes the inference client and returns the answer together
//! with the context used. Owns one document store; conversation history is
//! never kept between requests.

use std::sync::{Arc, PoisonError, RwLock as StdRwLock};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::prompt_builder::PromptBuilder;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    ChatState, Chunk, ChunkingConfig, Config, IngestRequest, IngestResponse, QueryRequest,
    QueryResponse,
};
use crate::domain::ports::InferenceClient;
use crate::infrastructure::vector::{Chunker, DocumentStore, EmbeddingDispatcher};

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Chunks retrieved per document-mode query
    pub top_k: usize,
    /// Most recent history messages included in a prompt
    pub max_history_messages: usize,
    /// Window used by [`Orchestrator::ingest_text`]
    pub chunking: ChunkingConfig,
    /// Embedding requests allowed in flight
    pub embedding_concurrency: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            top_k: config.retrieval.top_k,
            max_history_messages: config.retrieval.max_history_messages,
            chunking: config.chunking,
            embedding_concurrency: config.embedding.max_concurrency,
        }
    }
}

/// Retrieval-augmented chat over a single corpus
pub struct Orchestrator {
    client: Arc<dyn InferenceClient>,
    store: DocumentStore,
    chunker: Chunker,
    prompts: PromptBuilder,
    top_k: usize,
    state: StdRwLock<ChatState>,
    /// Exclusive for ingestion, shared for document-mode retrieval
    corpus_lock: RwLock<()>,
}

impl Orchestrator {
    /// Create an orchestrator with an empty store
    pub fn new(client: Arc<dyn InferenceClient>, config: OrchestratorConfig) -> RagResult<Self> {
        let chunker = Chunker::with_config(config.chunking)?;
        let dispatcher = EmbeddingDispatcher::new(Arc::clone(&client), config.embedding_concurrency);

        Ok(Self {
            store: DocumentStore::new(dispatcher),
            client,
            chunker,
            prompts: PromptBuilder::new(config.max_history_messages),
            top_k: config.top_k.max(1),
            state: StdRwLock::new(ChatState::Idle),
            corpus_lock: RwLock::new(()),
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> ChatState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The document store backing this orchestrator
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn transition(&self, next: ChatState) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.can_transition_to(next) {
            debug!(from = %*state, to = %next, "chat state transition");
            *state = next;
        } else {
            warn!(from = %*state, to = %next, "ignoring illegal chat state transition");
        }
    }

    /// State to fall back to after a failed query
    async fn settle(&self) {
        let next = if self.store.is_empty().await {
            ChatState::Idle
        } else {
            ChatState::DocumentLoaded
        };
        self.transition(next);
    }

    /// Replace the corpus with pre-chunked text.
    ///
    /// Blank chunks are dropped; a request with no usable chunk is rejected.
    pub async fn ingest(&self, request: IngestRequest) -> RagResult<IngestResponse> {
        let chunks: Vec<Chunk> = request
            .chunks
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .enumerate()
            .map(|(id, text)| Chunk::new(id, text))
            .collect();

        if chunks.is_empty() {
            return Err(RagError::validation("chunks are required"));
        }

        self.replace_corpus(chunks).await
    }

    /// Chunk raw document text and replace the corpus with it.
    pub async fn ingest_text(&self, text: &str) -> RagResult<IngestResponse> {
        if text.trim().is_empty() {
            return Err(RagError::validation("document text is empty"));
        }

        let chunks = self.chunker.chunk(text);
        self.replace_corpus(chunks).await
    }

    #[instrument(skip(self, chunks), fields(chunk_count = chunks.len()))]
    async fn replace_corpus(&self, chunks: Vec<Chunk>) -> RagResult<IngestResponse> {
        let _corpus = self.corpus_lock.write().await;

        self.store.clear().await;
        self.transition(ChatState::Idle);

        let chunk_count = self.store.add_documents(chunks).await.inspect_err(|e| {
            warn!(error = %e, "ingestion failed, store left empty");
        })?;

        self.transition(ChatState::DocumentLoaded);
        info!(chunk_count, "document loaded");

        Ok(IngestResponse {
            success: true,
            chunk_count,
        })
    }

    /// Answer a query, grounded in the corpus when `is_pdf_mode` is set.
    ///
    /// Document mode fails with [`RagError::RetrievalEmpty`] instead of
    /// answering without context.
    #[instrument(skip(self, request), fields(document_mode = request.is_pdf_mode, history = request.history.len()))]
    pub async fn query(&self, request: QueryRequest) -> RagResult<QueryResponse> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(RagError::validation("message is required"));
        }

        self.transition(ChatState::Querying);

        let result = self.answer(message, &request).await;
        match result {
            Ok(response) => {
                self.transition(ChatState::Answered);
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, status = %e.status(), "query failed");
                self.settle().await;
                Err(e)
            }
        }
    }

    async fn answer(&self, message: &str, request: &QueryRequest) -> RagResult<QueryResponse> {
        let (prompt, context) = if request.is_pdf_mode {
            let context = {
                let _corpus = self.corpus_lock.read().await;
                self.store.similarity_search(message, self.top_k).await?
            };

            if context.is_empty() {
                return Err(RagError::RetrievalEmpty);
            }

            debug!(retrieved = context.len(), "context retrieved");
            (
                self.prompts.document(&context, &request.history, message),
                context,
            )
        } else {
            (self.prompts.general(&request.history, message), Vec::new())
        };

        let response = self.client.generate(&prompt).await?;

        info!(
            response_len = response.len(),
            context_used = context.len(),
            "query answered"
        );
        Ok(QueryResponse { response, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorStatus;
    use crate::domain::models::{ConnectionState, ConversationMessage, EmbeddingVector, ModelInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Embeds by vowel counts and records every prompt it is asked to complete.
    ///
    /// `"poison"` fails to embed and `"wide"` embeds with an extra dimension.
    #[derive(Default)]
    struct RecordingClient {
        prompts: Mutex<Vec<String>>,
        fail_generate: bool,
        embed_delay: Option<Duration>,
    }

    impl RecordingClient {
        fn slow(delay_ms: u64) -> Self {
            Self {
                embed_delay: Some(Duration::from_millis(delay_ms)),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl InferenceClient for RecordingClient {
        fn endpoint(&self) -> &str {
            "stub://recording"
        }

        async fn connection_state(&self) -> ConnectionState {
            ConnectionState::Connected
        }

        async fn active_model(&self) -> Option<String> {
            Some("recording".to_string())
        }

        async fn check_connection(&self) -> RagResult<String> {
            Ok("recording".to_string())
        }

        async fn list_models(&self) -> RagResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn generate(&self, prompt: &str) -> RagResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail_generate {
                return Err(RagError::Generation {
                    status: Some(500),
                    message: "model crashed".to_string(),
                });
            }
            Ok("stub answer".to_string())
        }

        async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
            if let Some(delay) = self.embed_delay {
                tokio::time::sleep(delay).await;
            }
            if texts.iter().any(|t| t == "poison") {
                return Err(RagError::Embedding {
                    status: Some(500),
                    message: "cannot embed".to_string(),
                });
            }

            Ok(texts
                .iter()
                .map(|t| {
                    let mut vector: EmbeddingVector = "aeiou"
                        .chars()
                        .map(|v| {
                            #[allow(clippy::cast_precision_loss)]
                            let count = t.matches(v).count() as f32;
                            count + 0.1
                        })
                        .collect();
                    if t == "wide" {
                        vector.push(1.0);
                    }
                    vector
                })
                .collect())
        }
    }

    fn orchestrator(client: Arc<RecordingClient>) -> Orchestrator {
        Orchestrator::new(client, OrchestratorConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_message_is_validation_error() {
        let orch = orchestrator(Arc::new(RecordingClient::default()));

        let err = orch.query(QueryRequest::general("   ")).await.unwrap_err();

        assert_eq!(err.status(), ErrorStatus::ValidationFailed);
        assert_eq!(orch.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_empty_ingest_is_validation_error() {
        let orch = orchestrator(Arc::new(RecordingClient::default()));

        let err = orch
            .ingest(IngestRequest {
                chunks: vec![String::new(), "  ".to_string()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
    }

    #[tokio::test]
    async fn test_general_mode_skips_retrieval() {
        let client = Arc::new(RecordingClient::default());
        let orch = orchestrator(client.clone());

        let response = orch.query(QueryRequest::general("Tell me a joke")).await.unwrap();

        assert_eq!(response.response, "stub answer");
        assert!(response.context.is_empty());
        assert_eq!(orch.state(), ChatState::Answered);
        let prompts = client.prompts.lock().unwrap();
        assert!(!prompts[0].contains("Context:"));
    }

    #[tokio::test]
    async fn test_document_mode_on_empty_store_fails_fast() {
        let client = Arc::new(RecordingClient::default());
        let orch = orchestrator(client.clone());

        let err = orch.query(QueryRequest::document("anything?")).await.unwrap_err();

        assert!(matches!(err, RagError::RetrievalEmpty));
        assert_eq!(err.status(), ErrorStatus::NoRelevantContext);
        assert!(client.prompts.lock().unwrap().is_empty());
        assert_eq!(orch.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_ingest_then_document_query() {
        let client = Arc::new(RecordingClient::default());
        let orch = orchestrator(client.clone());

        let ingested = orch
            .ingest(IngestRequest {
                chunks: vec!["banana".to_string(), "kiwi".to_string(), "apple".to_string()],
            })
            .await
            .unwrap();
        assert!(ingested.success);
        assert_eq!(ingested.chunk_count, 3);
        assert_eq!(orch.state(), ChatState::DocumentLoaded);

        let history = vec![
            ConversationMessage::user("earlier question"),
            ConversationMessage::assistant("earlier answer"),
        ];
        let response = orch
            .query(QueryRequest::document("which fruit?").with_history(history))
            .await
            .unwrap();

        assert_eq!(response.context.len(), 3);
        let prompts = client.prompts.lock().unwrap();
        assert!(prompts[0].contains("Context:"));
        assert!(prompts[0].contains("earlier answer"));
        assert!(prompts[0].ends_with("User: which fruit?\nAssistant:"));
    }

    #[tokio::test]
    async fn test_reingest_replaces_corpus() {
        let orch = orchestrator(Arc::new(RecordingClient::default()));

        orch.ingest(IngestRequest {
            chunks: vec!["one".to_string(), "two".to_string()],
        })
        .await
        .unwrap();
        orch.ingest_text("a fresh document").await.unwrap();

        let chunks = orch.store().chunks().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a fresh document");
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_and_settles() {
        let client = Arc::new(RecordingClient {
            fail_generate: true,
            ..Default::default()
        });
        let orch = orchestrator(client);
        orch.ingest_text("some document text").await.unwrap();

        let err = orch.query(QueryRequest::document("question")).await.unwrap_err();

        assert_eq!(err.status(), ErrorStatus::GenerationFailed);
        assert_eq!(orch.state(), ChatState::DocumentLoaded);
    }

    fn chunks(texts: &[&str]) -> IngestRequest {
        IngestRequest {
            chunks: texts.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    async fn stored_texts(orch: &Orchestrator) -> Vec<String> {
        orch.store().chunks().await.into_iter().map(|c| c.text).collect()
    }

    #[tokio::test]
    async fn test_failed_reingest_leaves_store_empty_and_idle() {
        let client = Arc::new(RecordingClient::default());
        let orch = orchestrator(client.clone());
        orch.ingest(chunks(&["one", "two"])).await.unwrap();
        assert_eq!(orch.state(), ChatState::DocumentLoaded);

        let err = orch.ingest(chunks(&["three", "poison"])).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding { .. }));
        assert!(orch.store().is_empty().await);
        assert_eq!(orch.state(), ChatState::Idle);

        orch.ingest(chunks(&["one", "two"])).await.unwrap();
        let err = orch.ingest(chunks(&["three", "wide"])).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 5, actual: 6 }));
        assert!(orch.store().is_empty().await);
        assert_eq!(orch.state(), ChatState::Idle);

        // The previous corpus is gone, so document mode has nothing to ground on
        let err = orch.query(QueryRequest::document("one?")).await.unwrap_err();
        assert!(matches!(err, RagError::RetrievalEmpty));
        assert!(client.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_waits_for_ingest_in_progress() {
        let client = Arc::new(RecordingClient::slow(50));
        let orch = orchestrator(client);
        orch.ingest(chunks(&["banana", "kiwi"])).await.unwrap();

        let replacement = ["apple", "cherry", "grape"];
        let (ingested, answered) = tokio::join!(orch.ingest(chunks(&replacement)), async {
            // Start once the ingestion has cleared the store and is embedding
            tokio::time::sleep(Duration::from_millis(10)).await;
            orch.query(QueryRequest::document("which fruit?")).await
        });

        assert_eq!(ingested.unwrap().chunk_count, 3);
        let response = answered.unwrap();
        assert_eq!(response.context.len(), 3);
        assert!(response
            .context
            .iter()
            .all(|text| replacement.contains(&text.as_str())));
    }

    #[tokio::test]
    async fn test_concurrent_ingests_never_interleave() {
        let orch = orchestrator(Arc::new(RecordingClient::slow(20)));
        let first = ["alpha", "beta"];
        let second = ["gamma", "delta", "epsilon"];

        let (a, b) = tokio::join!(orch.ingest(chunks(&first)), orch.ingest(chunks(&second)));
        a.unwrap();
        b.unwrap();

        let stored = stored_texts(&orch).await;
        assert!(stored == first || stored == second, "mixed corpus: {stored:?}");
        assert_eq!(orch.state(), ChatState::DocumentLoaded);
    }
}
