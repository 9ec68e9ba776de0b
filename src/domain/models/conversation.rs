//! Domain models for the request/response contract of the orchestrator.
//!
//! History is always supplied by the caller and lives only for the duration
//! of one request; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the user
    User,
    /// Message produced by the model
    Assistant,
}

impl Role {
    /// Label used when rendering history into a prompt.
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of caller-supplied conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who wrote the message
    pub role: Role,

    /// Message text
    pub content: String,

    /// Excerpts that grounded an assistant answer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
}

impl ConversationMessage {
    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            context: None,
        }
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            context: None,
        }
    }

    /// Attaches the excerpts used to produce this message
    #[must_use]
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = Some(context);
        self
    }
}

/// Ingestion request: pre-chunked document text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Chunk texts in document order
    #[serde(default)]
    pub chunks: Vec<String>,
}

/// Ingestion acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Always true on success
    pub success: bool,

    /// Number of chunks now held by the store
    pub chunk_count: usize,
}

/// Query request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// The user's question
    #[serde(default)]
    pub message: String,

    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<ConversationMessage>,

    /// Ground the answer in the loaded document
    #[serde(default, rename = "isPDFMode")]
    pub is_pdf_mode: bool,
}

impl QueryRequest {
    /// A document-grounded query with no history
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            is_pdf_mode: true,
        }
    }

    /// An ungrounded query with no history
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            is_pdf_mode: false,
        }
    }

    /// Replaces the history
    #[must_use]
    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Query answer plus the excerpts used to ground it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer text
    pub response: String,

    /// Retrieved excerpts, best match first (empty outside document mode)
    pub context: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_wire_format() {
        let json = r#"{
            "message": "What is this about?",
            "history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello", "context": ["a"]}
            ],
            "isPDFMode": true
        }"#;

        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.message, "What is this about?");
        assert!(request.is_pdf_mode);
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].role, Role::User);
        assert_eq!(request.history[1].context, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_query_request_missing_fields_default() {
        let request: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.message.is_empty());
        assert!(request.history.is_empty());
        assert!(!request.is_pdf_mode);
    }

    #[test]
    fn test_ingest_request_wire_format() {
        let request: IngestRequest =
            serde_json::from_str(r#"{"chunks": ["one", "two"]}"#).unwrap();
        assert_eq!(request.chunks, vec!["one", "two"]);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "User");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
