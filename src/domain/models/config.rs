use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;

/// Main configuration structure for Docent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Inference endpoint configuration
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Model selection policy
    #[serde(default)]
    pub model: ModelConfig,

    /// Connection retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Chunking window configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval and prompt assembly configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Embedding dispatch configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inference endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointConfig {
    /// Base URL of the local inference server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Model selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    /// Preferred generation model name
    #[serde(default = "default_preferred_model")]
    pub preferred: String,

    /// Name fragments that disqualify a model from the fallback pick
    #[serde(default = "default_excluded_models")]
    pub excluded: Vec<String>,

    /// Dedicated embedding model; the selected generation model is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

fn default_preferred_model() -> String {
    "llama3.2".to_string()
}

fn default_excluded_models() -> Vec<String> {
    vec!["embed".to_string()]
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred_model(),
            excluded: default_excluded_models(),
            embedding_model: None,
        }
    }
}

/// Connection retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Discovery attempts per connection check
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Retrieval and prompt assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Chunks retrieved per document-mode query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Most recent history messages included in a prompt
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,
}

const fn default_top_k() -> usize {
    3
}

const fn default_max_history_messages() -> usize {
    10
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_history_messages: default_max_history_messages(),
        }
    }
}

/// Embedding dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Embedding calls allowed in flight at once (1 = strictly sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

const fn default_max_concurrency() -> usize {
    1
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
