//! BudgetIt Core Library
//!
//! Shared functionality for the BudgetIt budgeting client:
//! - Insight engine turning weekly spend/budget figures into advice
//! - Timed, randomly selected insight notifications
//! - HTTP client for the BudgetIt REST backend (cookie sessions)
//! - Explicit login session with on-disk persistence
//! - Pluggable generative-text backends and the assistant chat
//! - Dashboard view model (totals, category rows, spending shares)
//! - Layered configuration (env > config.toml > defaults)

pub mod api;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod models;
pub mod session;

/// Test utilities including mock backend and LLM servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use api::ApiClient;
pub use chat::{
    ChatBackend, ChatClient, ChatMessage, ChatSession, GeminiBackend, MockBackend, MockReply,
    OllamaBackend, Sender,
};
pub use config::Config;
pub use dashboard::{CategoryRow, CategoryShare, DashboardState};
pub use error::{Error, Result};
pub use insights::{
    generate_insights, pick_notification, FixedIndex, Insight, InsightKind, Notification,
    Notifier, RandomSource, SpendingBand,
};
pub use models::{
    Budget, BudgetPeriod, Category, CategorySnapshot, Credentials, Expense, Goal, NewBudget,
    NewExpense, NewGoal, SignupRequest, Totals, User, UserType, WeeklyAnalytics,
};
pub use session::{AuthState, Session, SessionStore, StoredSession};
