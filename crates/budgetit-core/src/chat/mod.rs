//! Pluggable generative-text backends for the budget assistant chat
//!
//! The chat treats the model as an opaque text-in/text-out oracle: it sends
//! one prompt per user message and shows whatever text comes back.
//!
//! # Architecture
//!
//! - `ChatBackend` trait: the interface every backend implements
//! - `ChatClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`, `MockBackend`
//! - `ChatSession`: the conversation (history + one-request-at-a-time guard)
//!
//! # Configuration
//!
//! Environment variables:
//! - `CHAT_BACKEND`: Backend to use (gemini, ollama, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_HOST`: API host (default: https://generativelanguage.googleapis.com)
//! - `GEMINI_MODEL`: Model name (default: gemini-2.0-flash)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)

mod gemini;
mod mock;
mod ollama;
pub mod session;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockReply};
pub use ollama::OllamaBackend;
pub use session::{
    ChatMessage, ChatSession, Sender, ASSISTANT_PERSONA, ERROR_REPLY, FALLBACK_REPLY,
    SUGGESTED_QUESTIONS, WELCOME_MESSAGE,
};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all chat backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a prompt and return the model's reply
    ///
    /// `Ok(None)` means the backend answered but the reply field was empty.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete chat client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ChatClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl ChatClient {
    /// Create a chat client from environment variables
    ///
    /// Checks `CHAT_BACKEND` to determine which backend to use. Returns None
    /// if the required environment variables for that backend are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("CHAT_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(ChatClient::Gemini),
            "ollama" => OllamaBackend::from_env().map(ChatClient::Ollama),
            "mock" => Some(ChatClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown CHAT_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(ChatClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        ChatClient::Mock(MockBackend::new())
    }
}

// Implement ChatBackend for ChatClient by delegating to the inner backend
#[async_trait]
impl ChatBackend for ChatClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        match self {
            ChatClient::Gemini(b) => b.generate(prompt).await,
            ChatClient::Ollama(b) => b.generate(prompt).await,
            ChatClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ChatClient::Gemini(b) => b.health_check().await,
            ChatClient::Ollama(b) => b.health_check().await,
            ChatClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ChatClient::Gemini(b) => b.model(),
            ChatClient::Ollama(b) => b.model(),
            ChatClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            ChatClient::Gemini(b) => b.host(),
            ChatClient::Ollama(b) => b.host(),
            ChatClient::Mock(b) => b.host(),
        }
    }
}

/// Treat whitespace-only replies as no reply
pub(crate) fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_client_mock() {
        let client = ChatClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = ChatClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_generate() {
        let client = ChatClient::mock();
        let reply = client.generate("how do I cut food costs").await.unwrap();
        assert!(reply.unwrap().contains("meal prep"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("hi".to_string())).as_deref(), Some("hi"));
    }
}
