//! Mock backend for testing
//!
//! Answers with canned budgeting advice picked by keyword, so the chat works
//! without network access or an API key.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{ChatBackend, ASSISTANT_PERSONA};

/// Canned replies, checked in order; the first keyword found wins
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    (
        "food",
        "Based on your spending patterns, food is one of your biggest categories this week. \
         Consider meal prep to save 30% on food costs!",
    ),
    (
        "laptop",
        "To save for a laptop, set aside a fixed amount every week and track it as a goal. \
         Small weekly deposits add up faster than you think.",
    ),
    (
        "budget",
        "Your weekly budget is your best friend. Review it every Sunday and trim \
         entertainment by 10% to boost savings.",
    ),
];

const DEFAULT_REPLY: &str = "I'm here to help with your budgeting needs! Ask me about your \
                             expenses, savings goals, or budget optimization.";

/// How the mock should answer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MockReply {
    /// Keyword-based canned answers
    #[default]
    Canned,
    /// Answer with an empty reply field
    Empty,
    /// Fail the request
    Fail,
}

/// Mock chat backend
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Reply behavior
    pub reply: MockReply,
    /// Artificial latency before answering
    pub delay: Option<Duration>,
}

impl MockBackend {
    /// Create a new mock backend (healthy, canned replies)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend whose requests fail
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            reply: MockReply::Fail,
            delay: None,
        }
    }

    /// Mock that answers with an empty reply field
    pub fn empty() -> Self {
        Self {
            reply: MockReply::Empty,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply {
            MockReply::Fail => Err(Error::InvalidData("Mock backend failure".into())),
            MockReply::Empty => Ok(None),
            MockReply::Canned => {
                let question = prompt.strip_prefix(ASSISTANT_PERSONA).unwrap_or(prompt);
                let lower = question.to_lowercase();
                let reply = KEYWORD_REPLIES
                    .iter()
                    .find(|(keyword, _)| lower.contains(keyword))
                    .map(|(_, reply)| *reply)
                    .unwrap_or(DEFAULT_REPLY);
                Ok(Some(reply.to_string()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
