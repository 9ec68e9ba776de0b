//! Per-session orchestrators sharing one inference client.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::domain::errors::RagResult;
use crate::domain::ports::InferenceClient;

/// Hands out one isolated [`Orchestrator`] per session id.
///
/// Every session owns its own document store; the inference client and its
/// connection state are shared.
pub struct SessionRegistry {
    client: Arc<dyn InferenceClient>,
    config: OrchestratorConfig,
    sessions: RwLock<HashMap<Uuid, Arc<Orchestrator>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(client: Arc<dyn InferenceClient>, config: OrchestratorConfig) -> Self {
        Self {
            client,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session and return its id
    pub async fn create(&self) -> RagResult<(Uuid, Arc<Orchestrator>)> {
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&self.client),
            self.config.clone(),
        )?);
        let id = Uuid::new_v4();

        self.sessions.write().await.insert(id, Arc::clone(&orchestrator));
        info!(session_id = %id, "session created");

        Ok((id, orchestrator))
    }

    /// Look up a session
    pub async fn get(&self, id: Uuid) -> Option<Arc<Orchestrator>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Ids of all live sessions
    pub async fn list(&self) -> Vec<Uuid> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Drop a session and its corpus; returns whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        debug!(session_id = %id, removed, "session removed");
        removed
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is live
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ConnectionState, EmbeddingVector, IngestRequest, ModelInfo};
    use async_trait::async_trait;

    struct ConstClient;

    #[async_trait]
    impl InferenceClient for ConstClient {
        fn endpoint(&self) -> &str {
            "stub://const"
        }

        async fn connection_state(&self) -> ConnectionState {
            ConnectionState::Connected
        }

        async fn active_model(&self) -> Option<String> {
            Some("const".to_string())
        }

        async fn check_connection(&self) -> RagResult<String> {
            Ok("const".to_string())
        }

        async fn list_models(&self) -> RagResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn generate(&self, _prompt: &str) -> RagResult<String> {
            Ok("ok".to_string())
        }

        async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(ConstClient), OrchestratorConfig::default())
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry();
        let (a, first) = registry.create().await.unwrap();
        let (b, second) = registry.create().await.unwrap();
        assert_ne!(a, b);

        first
            .ingest(IngestRequest {
                chunks: vec!["only in a".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(first.store().len().await, 1);
        assert!(second.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_get_list_remove() {
        let registry = registry();
        let (id, _) = registry.create().await.unwrap();

        assert!(registry.get(id).await.is_some());
        assert_eq!(registry.list().await, vec![id]);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.get(id).await.is_none());
        assert!(registry.is_empty().await);
    }
}
