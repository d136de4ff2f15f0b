//! Budget assistant conversation
//!
//! A [`ChatSession`] owns the message history shown to the user and allows
//! one backend request at a time. Backend trouble never surfaces as an
//! error: the assistant answers with a fallback line instead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::{ChatBackend, ChatClient};

/// Prepended to every user message before it reaches the model
pub const ASSISTANT_PERSONA: &str = "You are BudgetIt AI, a friendly budget assistant. ";

/// First message of every conversation
pub const WELCOME_MESSAGE: &str = "✨ Hey there! I'm your AI budget buddy! Ask me anything about \
                                   your expenses, savings goals, or get personalized budget tips! 💰";

/// Shown when the model answers without any text
pub const FALLBACK_REPLY: &str = "😅 Sorry, I couldn't understand that.";

/// Shown when the model could not be reached
pub const ERROR_REPLY: &str = "😅 Oops! Something went wrong. Please try again!";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How to save more money?",
    "Give me student budget tips!",
    "How to track my expenses?",
    "How to set saving goals?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Conversation with the budget assistant
pub struct ChatSession {
    client: ChatClient,
    messages: Mutex<Vec<ChatMessage>>,
    in_flight: AtomicBool,
    next_id: AtomicU64,
}

/// Clears the in-flight flag when a send finishes or is cancelled
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatSession {
    /// Start a conversation containing only the welcome message
    pub fn new(client: ChatClient) -> Self {
        let session = Self {
            client,
            messages: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        };
        session.push(WELCOME_MESSAGE.to_string(), Sender::Bot);
        session
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    /// Send a user message and wait for the assistant's answer
    ///
    /// Blank input is ignored (`Ok(None)`). While another message is awaiting
    /// its answer this fails with [`Error::ChatBusy`] and records nothing.
    pub async fn send(&self, text: &str) -> Result<Option<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::ChatBusy);
        }
        let _guard = InFlight(&self.in_flight);

        self.push(text.to_string(), Sender::User);

        let prompt = format!("{}{}", ASSISTANT_PERSONA, text);
        let reply = match self.client.generate(&prompt).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                debug!(model = %self.client.model(), "Empty chat reply");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(error = %e, host = %self.client.host(), "Chat backend failed");
                ERROR_REPLY.to_string()
            }
        };

        Ok(Some(self.push(reply, Sender::Bot)))
    }

    /// Snapshot of the conversation so far
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn push(&self, text: String, sender: Sender) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text,
            sender,
            timestamp: Utc::now(),
        };
        self.lock().push(message.clone());
        message
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
