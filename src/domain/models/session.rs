//! Domain models for the chat session lifecycle.
//!
//! A session moves `Idle → DocumentLoaded → Querying → Answered` and loops
//! back to `Querying` for every further question. Loading a new document
//! re-enters `DocumentLoaded` from any state.

use serde::{Deserialize, Serialize};

/// Chat session lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    /// No document loaded
    #[default]
    Idle,
    /// A document has been chunked, embedded and stored
    DocumentLoaded,
    /// A query is being answered
    Querying,
    /// The last query produced an answer
    Answered,
}

impl ChatState {
    /// Whether `self → next` is a legal transition
    pub const fn can_transition_to(self, next: Self) -> bool {
        match next {
            // Ingestion is allowed from anywhere and a failed ingestion falls back to Idle.
            // Ungrounded queries may run before any document is loaded, and
            // concurrent requests may overlap.
            Self::DocumentLoaded | Self::Idle | Self::Querying => true,
            Self::Answered => matches!(self, Self::Querying),
        }
    }
}

impl std::fmt::Display for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::DocumentLoaded => "document_loaded",
            Self::Querying => "querying",
            Self::Answered => "answered",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_allowed_from_any_state() {
        for state in [
            ChatState::Idle,
            ChatState::DocumentLoaded,
            ChatState::Querying,
            ChatState::Answered,
        ] {
            assert!(state.can_transition_to(ChatState::DocumentLoaded));
        }
    }

    #[test]
    fn test_answered_only_after_querying() {
        assert!(ChatState::Querying.can_transition_to(ChatState::Answered));
        assert!(!ChatState::Idle.can_transition_to(ChatState::Answered));
        assert!(!ChatState::DocumentLoaded.can_transition_to(ChatState::Answered));
    }

    #[test]
    fn test_answered_loops_back_to_querying() {
        assert!(ChatState::Answered.can_transition_to(ChatState::Querying));
        assert!(ChatState::DocumentLoaded.can_transition_to(ChatState::Querying));
    }
}
