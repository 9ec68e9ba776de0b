//! Embedding dispatch with bounded concurrency.
//!
//! Texts are embedded one request each. With a concurrency of one the whole
//! batch goes to the client in order; above that, requests run in parallel
//! under a semaphore and the vectors are reassembled by input index.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingVector;
use crate::domain::ports::InferenceClient;

/// Dispatches embedding requests to an inference client
#[derive(Clone)]
pub struct EmbeddingDispatcher {
    client: Arc<dyn InferenceClient>,
    max_concurrency: usize,
}

impl EmbeddingDispatcher {
    /// Create a dispatcher; a concurrency below one is treated as one.
    pub fn new(client: Arc<dyn InferenceClient>, max_concurrency: usize) -> Self {
        Self {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Sequential dispatcher
    pub fn sequential(client: Arc<dyn InferenceClient>) -> Self {
        Self::new(client, 1)
    }

    /// Maximum number of in-flight embedding requests
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Embed a single query text.
    pub async fn embed_query(&self, text: &str) -> RagResult<EmbeddingVector> {
        let mut vectors = self.client.embed(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| RagError::Embedding {
            status: None,
            message: "no embedding returned for query".to_string(),
        })
    }

    /// Embed every text, returning vectors in input order.
    ///
    /// Aborts on the first failure; no partial result is returned.
    pub async fn embed_all(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if self.max_concurrency == 1 || texts.len() == 1 {
            return self.client.embed(texts).await;
        }

        // Resolve the model once so parallel requests don't race the discovery check
        self.client.check_connection().await?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, text) in texts.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let client = Arc::clone(&self.client);
            let text = text.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| RagError::Embedding {
                    status: None,
                    message: format!("embedding dispatcher closed: {e}"),
                })?;
                let mut vectors = client.embed(std::slice::from_ref(&text)).await?;
                let vector = vectors.pop().ok_or_else(|| RagError::Embedding {
                    status: None,
                    message: format!("no embedding returned for text {index}"),
                })?;
                Ok::<_, RagError>((index, vector))
            });
        }

        let mut slots: Vec<Option<EmbeddingVector>> = vec![None; texts.len()];
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| RagError::Embedding {
                status: None,
                message: format!("embedding task failed: {e}"),
            });

            match outcome.and_then(|inner| inner) {
                Ok((index, vector)) => slots[index] = Some(vector),
                Err(e) => {
                    error!(error = %e, "embedding failed, aborting batch");
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        debug!(
            count = texts.len(),
            concurrency = self.max_concurrency,
            "embeddings dispatched"
        );

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| RagError::Embedding {
                    status: None,
                    message: format!("missing embedding for text {index}"),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ConnectionState, ModelInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Embeds each text as `[len, index-of-call]`, optionally failing on one text
    struct CountingClient {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        fail_on: Option<String>,
    }

    impl CountingClient {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                fail_on: fail_on.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl InferenceClient for CountingClient {
        fn endpoint(&self) -> &str {
            "stub://counting"
        }

        async fn connection_state(&self) -> ConnectionState {
            ConnectionState::Connected
        }

        async fn active_model(&self) -> Option<String> {
            Some("stub".to_string())
        }

        async fn check_connection(&self) -> RagResult<String> {
            Ok("stub".to_string())
        }

        async fn list_models(&self) -> RagResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn generate(&self, _prompt: &str) -> RagResult<String> {
            Ok(String::new())
        }

        async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_on.as_deref() == Some(text.as_str()) {
                    return Err(RagError::Embedding {
                        status: Some(500),
                        message: "boom".to_string(),
                    });
                }
                #[allow(clippy::cast_precision_loss)]
                let len = text.len() as f32;
                out.push(vec![len, 1.0]);
            }
            Ok(out)
        }
    }

    fn texts() -> Vec<String> {
        ["a", "bb", "ccc", "dddd", "eeeee", "ffffff"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_parallel_preserves_input_order() {
        let client = Arc::new(CountingClient::new(None));
        let dispatcher = EmbeddingDispatcher::new(client.clone(), 3);

        let vectors = dispatcher.embed_all(&texts()).await.unwrap();

        let lengths: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(client.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_sequential_single_batch_call() {
        let client = Arc::new(CountingClient::new(None));
        let dispatcher = EmbeddingDispatcher::sequential(client.clone());

        let vectors = dispatcher.embed_all(&texts()).await.unwrap();

        assert_eq!(vectors.len(), 6);
        assert_eq!(client.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_aborts_batch() {
        let client = Arc::new(CountingClient::new(Some("ccc")));
        let dispatcher = EmbeddingDispatcher::new(client, 2);

        let result = dispatcher.embed_all(&texts()).await;
        assert!(matches!(result, Err(RagError::Embedding { status: Some(500), .. })));
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped() {
        let client = Arc::new(CountingClient::new(None));
        assert_eq!(EmbeddingDispatcher::new(client, 0).max_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_embed_query() {
        let client = Arc::new(CountingClient::new(None));
        let dispatcher = EmbeddingDispatcher::sequential(client);
        assert_eq!(dispatcher.embed_query("four").await.unwrap(), vec![4.0, 1.0]);
    }
}
