//! Prompt assembly for grounded and general queries.

use crate::domain::models::ConversationMessage;

const DOCUMENT_INSTRUCTION: &str = "You are a helpful assistant answering questions about a document. \
Answer using only the context excerpts below. If the context does not contain the answer, \
say that the document does not cover it.";

const GENERAL_INSTRUCTION: &str =
    "You are a helpful assistant. Answer the user's question clearly and concisely.";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Builds generation prompts from instruction, context, history and message
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_history_messages: usize,
}

impl PromptBuilder {
    /// Create a builder that keeps at most `max_history_messages` of history
    pub const fn new(max_history_messages: usize) -> Self {
        Self {
            max_history_messages,
        }
    }

    /// Prompt grounded in retrieved `context`
    pub fn document(
        &self,
        context: &[String],
        history: &[ConversationMessage],
        message: &str,
    ) -> String {
        let mut prompt = String::from(DOCUMENT_INSTRUCTION);
        prompt.push_str("\n\nContext:\n");
        prompt.push_str(&context.join(CONTEXT_SEPARATOR));
        self.push_conversation(&mut prompt, history, message);
        prompt
    }

    /// Prompt without retrieval
    pub fn general(&self, history: &[ConversationMessage], message: &str) -> String {
        let mut prompt = String::from(GENERAL_INSTRUCTION);
        self.push_conversation(&mut prompt, history, message);
        prompt
    }

    /// The trailing window of `history` that enters the prompt
    pub fn history_window<'a>(&self, history: &'a [ConversationMessage]) -> &'a [ConversationMessage] {
        let skip = history.len().saturating_sub(self.max_history_messages);
        &history[skip..]
    }

    fn push_conversation(&self, prompt: &mut String, history: &[ConversationMessage], message: &str) {
        let window = self.history_window(history);
        if !window.is_empty() {
            prompt.push_str("\n\nConversation so far:\n");
            for turn in window {
                prompt.push_str(turn.role.label());
                prompt.push_str(": ");
                prompt.push_str(turn.content.trim());
                prompt.push('\n');
            }
        } else {
            prompt.push_str("\n\n");
        }

        prompt.push_str("User: ");
        prompt.push_str(message.trim());
        prompt.push_str("\nAssistant:");
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(10)
    }
}
