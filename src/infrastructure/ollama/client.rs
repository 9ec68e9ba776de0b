use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::retry::RetryPolicy;
use super::types::{
    EmbeddingsRequest, EmbeddingsResponse, GenerateRequest, GenerateResponse, TagsResponse,
};
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    Config, ConnectionState, EmbeddingVector, ModelDiscovery, ModelInfo,
};
use crate::domain::ports::InferenceClient;

/// Configuration for the Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClientConfig {
    /// Base URL of the inference server
    pub base_url: String,

    /// Per-request transport timeout in seconds
    pub timeout_secs: u64,

    /// Preferred generation model
    pub preferred_model: String,

    /// Name fragments excluded from the fallback pick
    pub excluded_models: Vec<String>,

    /// Dedicated embedding model (defaults to the selected model)
    pub embedding_model: Option<String>,

    /// Discovery attempts per connection check
    pub max_retries: u32,

    /// Delay between discovery attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for OllamaClientConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OllamaClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.endpoint.base_url.clone(),
            timeout_secs: config.endpoint.timeout_secs,
            preferred_model: config.model.preferred.clone(),
            excluded_models: config.model.excluded.clone(),
            embedding_model: config.model.embedding_model.clone(),
            max_retries: config.retry.max_retries,
            retry_delay_ms: config.retry.retry_delay_ms,
        }
    }
}

/// Connection snapshot guarded by the client
#[derive(Debug, Default)]
struct Connection {
    state: ConnectionState,
    model: Option<String>,
}

/// HTTP client for a local Ollama-compatible inference server
///
/// Owns the connection lifecycle:
/// - model discovery with fixed-delay retries
/// - typed model selection (preferred → non-excluded fallback → none)
/// - non-streaming generation
/// - one embedding call per text
pub struct OllamaClient {
    http_client: ReqwestClient,
    base_url: String,
    preferred_model: String,
    excluded_models: Vec<String>,
    embedding_model: Option<String>,
    retry_policy: RetryPolicy,
    connection: RwLock<Connection>,
    /// Serializes connection checks so concurrent callers share one check
    connect_lock: Mutex<()>,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// No network call is made; the state starts as `Unknown`.
    ///
    /// # Example
    /// ```no_run
    /// use docent::infrastructure::ollama::{OllamaClient, OllamaClientConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = OllamaClient::new(OllamaClientConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OllamaClientConfig) -> RagResult<Self> {
        info!(
            base_url = %config.base_url,
            preferred_model = %config.preferred_model,
            max_retries = config.max_retries,
            retry_delay_ms = config.retry_delay_ms,
            timeout_secs = config.timeout_secs,
            "initializing inference client"
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| RagError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            preferred_model: config.preferred_model,
            excluded_models: config.excluded_models,
            embedding_model: config.embedding_model,
            retry_policy: RetryPolicy::new(config.max_retries, config.retry_delay_ms),
            connection: RwLock::new(Connection::default()),
            connect_lock: Mutex::new(()),
        })
    }

    fn snapshot(&self) -> (ConnectionState, Option<String>) {
        let conn = self.connection.read().unwrap_or_else(PoisonError::into_inner);
        (conn.state, conn.model.clone())
    }

    fn set_connection(&self, state: ConnectionState, model: Option<String>) {
        let mut conn = self.connection.write().unwrap_or_else(PoisonError::into_inner);
        debug!(from = %conn.state, to = %state, "connection state transition");
        conn.state = state;
        conn.model = model;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the model listing once
    async fn fetch_models(&self) -> Result<Vec<ModelInfo>, String> {
        let response = self
            .http_client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(format!("HTTP {status}: {body}"));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid model listing: {e}"))?;

        Ok(tags.models.into_iter().map(ModelInfo::from).collect())
    }

    /// Model used for embedding calls
    async fn embedding_model(&self) -> RagResult<String> {
        match &self.embedding_model {
            Some(model) => {
                // The endpoint must still be reachable before embedding
                self.check_connection().await?;
                Ok(model.clone())
            }
            None => self.check_connection().await,
        }
    }

    /// Embed a single text with an already-resolved model
    async fn embed_one(&self, model: &str, text: &str) -> RagResult<EmbeddingVector> {
        let response = self
            .http_client
            .post(self.url("/api/embeddings"))
            .json(&EmbeddingsRequest {
                model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| RagError::Embedding {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            warn!(%status, %body, "embedding request rejected");
            return Err(RagError::Embedding {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let parsed: EmbeddingsResponse =
            response.json().await.map_err(|e| RagError::Embedding {
                status: Some(status.as_u16()),
                message: format!("invalid embedding response: {e}"),
            })?;

        if parsed.embedding.is_empty() {
            return Err(RagError::Embedding {
                status: Some(status.as_u16()),
                message: format!("model '{model}' returned an empty embedding"),
            });
        }

        Ok(parsed.embedding)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn connection_state(&self) -> ConnectionState {
        self.snapshot().0
    }

    async fn active_model(&self) -> Option<String> {
        self.snapshot().1
    }

    #[instrument(skip(self), fields(endpoint = %self.base_url))]
    async fn check_connection(&self) -> RagResult<String> {
        if let (ConnectionState::Connected, Some(model)) = self.snapshot() {
            return Ok(model);
        }

        let _guard = self.connect_lock.lock().await;

        // Another caller may have connected while we waited
        if let (ConnectionState::Connected, Some(model)) = self.snapshot() {
            return Ok(model);
        }

        self.set_connection(ConnectionState::Connecting, None);

        let listing = self
            .retry_policy
            .execute(|attempt| {
                debug!(attempt, "probing model listing");
                self.fetch_models()
            })
            .await;

        let models = match listing {
            Ok(models) => models,
            Err(exhausted) => {
                self.set_connection(ConnectionState::Failed, None);
                error!(
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "inference endpoint unreachable"
                );
                return Err(RagError::Connection {
                    endpoint: self.base_url.clone(),
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error,
                });
            }
        };

        let names: Vec<String> = models.into_iter().map(|m| m.name).collect();
        match ModelDiscovery::select(&names, &self.preferred_model, &self.excluded_models) {
            ModelDiscovery::Found(model) => {
                if model != self.preferred_model
                    && model != format!("{}:latest", self.preferred_model)
                {
                    info!(
                        preferred = %self.preferred_model,
                        selected = %model,
                        "preferred model not installed, using fallback"
                    );
                }
                info!(model = %model, "connected to inference endpoint");
                self.set_connection(ConnectionState::Connected, Some(model.clone()));
                Ok(model)
            }
            ModelDiscovery::NotFound { available } => {
                self.set_connection(ConnectionState::Failed, None);
                error!(?available, "no usable model installed");
                Err(RagError::ModelNotFound {
                    endpoint: self.base_url.clone(),
                    available,
                })
            }
        }
    }

    async fn list_models(&self) -> RagResult<Vec<ModelInfo>> {
        self.fetch_models()
            .await
            .map_err(|last_error| RagError::Connection {
                endpoint: self.base_url.clone(),
                attempts: 1,
                last_error,
            })
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> RagResult<String> {
        let model = self.check_connection().await?;

        debug!(model = %model, "POST /api/generate");
        let response = self
            .http_client
            .post(self.url("/api/generate"))
            .json(&GenerateRequest {
                model: &model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| RagError::Generation {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            warn!(%status, %body, "generation request rejected");
            return Err(RagError::Generation {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let parsed: GenerateResponse =
            response.json().await.map_err(|e| RagError::Generation {
                status: Some(status.as_u16()),
                message: format!("invalid generation response: {e}"),
            })?;

        info!(model = %model, response_len = parsed.response.len(), "generation succeeded");
        Ok(parsed.response)
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed(&self, texts: &[String]) -> RagResult<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.embedding_model().await?;

        // One round-trip per text, in order, to keep load on the local server bounded
        let mut vectors = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            let vector = self.embed_one(&model, text).await.inspect_err(|e| {
                error!(index, error = %e, "embedding failed, aborting batch");
            })?;
            vectors.push(vector);
        }

        debug!(model = %model, count = vectors.len(), "embeddings generated");
        Ok(vectors)
    }
}

async fn read_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string())
}
