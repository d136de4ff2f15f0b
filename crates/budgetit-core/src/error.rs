//! Error types for BudgetIt

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure; the request URL is stripped since it may carry credentials
    #[error("HTTP request error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend rejected the request because there is no valid session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Sign-in was refused; carries the backend's message
    #[error("Sign-in rejected: {0}")]
    InvalidCredentials(String),

    /// The backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    /// A chat message is already waiting for its reply
    #[error("A chat request is already in progress")]
    ChatBusy,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
