//! HTTP client for the BudgetIt backend
//!
//! The backend keeps the login session in a cookie. The client captures the
//! `Set-Cookie` header from every response and replays it on later requests,
//! so a client (or a clone of it) behaves like a logged-in browser tab.
//!
//! # Configuration
//!
//! The base URL comes from [`crate::config::Config::api_url`]
//! (default `http://localhost:5000/api`).

use std::sync::{Arc, RwLock};

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    Budget, CategorySnapshot, Credentials, Expense, Goal, NewBudget, NewExpense, NewGoal,
    SignupRequest, User, WeeklyAnalytics,
};

/// BudgetIt backend client
///
/// Cheap to clone; clones share the session cookie.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    cookie: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The cookie is a credential; only report whether one is held
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_cookie", &self.cookie().is_some())
            .finish()
    }
}

/// What a 401 from the backend means for a given request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unauthorized {
    /// The session cookie is missing or expired
    SessionRejected,
    /// The submitted email/password pair was wrong
    BadCredentials,
}

/// `{user}` body returned by the auth endpoints
#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: User,
}

/// `{id}` body returned by create endpoints
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: i64,
}

/// `{error}` body returned on failures
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a client that resumes an existing session
    pub fn with_cookie(base_url: &str, cookie: &str) -> Self {
        let client = Self::new(base_url);
        client.set_cookie(Some(cookie.to_string()));
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session cookie, if the backend has issued one
    pub fn cookie(&self) -> Option<String> {
        match self.cookie.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_cookie(&self, cookie: Option<String>) {
        let mut guard = match self.cookie.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = cookie;
    }

    // ========== Auth ==========

    pub async fn signup(&self, request: &SignupRequest) -> Result<User> {
        let response: AuthResponse = self.post("/auth/signup", request).await?;
        Ok(response.user)
    }

    /// Wrong credentials are `Error::InvalidCredentials`, not `Unauthenticated`
    pub async fn signin(&self, credentials: &Credentials) -> Result<User> {
        let request = self
            .http_client
            .post(self.url("/auth/signin"))
            .json(credentials);
        let response = self.send_as(request, Unauthorized::BadCredentials).await?;
        let body: AuthResponse = response.json().await?;
        Ok(body.user)
    }

    pub async fn logout(&self) -> Result<()> {
        let request = self.http_client.post(self.url("/auth/logout"));
        self.send(request).await?;
        Ok(())
    }

    /// The user owning the current session (`Error::Unauthenticated` if none)
    pub async fn current_user(&self) -> Result<User> {
        let response: AuthResponse = self.get("/auth/me").await?;
        Ok(response.user)
    }

    // ========== Expenses ==========

    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.get("/expenses").await
    }

    /// Create an expense, returning its id
    pub async fn add_expense(&self, expense: &NewExpense) -> Result<i64> {
        let response: CreatedResponse = self.post("/expenses", expense).await?;
        Ok(response.id)
    }

    // ========== Budgets ==========

    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.get("/budgets").await
    }

    pub async fn set_budget(&self, budget: &NewBudget) -> Result<()> {
        let request = self.http_client.post(self.url("/budgets")).json(budget);
        self.send(request).await?;
        Ok(())
    }

    // ========== Goals ==========

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.get("/goals").await
    }

    /// Create a goal, returning its id
    pub async fn add_goal(&self, goal: &NewGoal) -> Result<i64> {
        let response: CreatedResponse = self.post("/goals", goal).await?;
        Ok(response.id)
    }

    // ========== Analytics ==========

    pub async fn weekly_analytics(&self) -> Result<WeeklyAnalytics> {
        self.get("/analytics/weekly").await
    }

    /// Weekly analytics in the shape the insight engine consumes
    pub async fn weekly_snapshot(&self) -> Result<CategorySnapshot> {
        Ok(self.weekly_analytics().await?.into())
    }

    /// Check whether the backend answers at all (any status counts)
    pub async fn health_check(&self) -> bool {
        self.http_client
            .get(self.url("/auth/me"))
            .send()
            .await
            .is_ok()
    }

    // ========== Plumbing ==========

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http_client.get(self.url(path));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http_client.post(self.url(path)).json(body);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.send_as(request, Unauthorized::SessionRejected).await
    }

    /// Attach the session cookie, send, remember any new cookie, map status
    async fn send_as(
        &self,
        mut request: RequestBuilder,
        on_401: Unauthorized,
    ) -> Result<Response> {
        if let Some(cookie) = self.cookie() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Backend response");

        if let Some(cookie) = session_cookie(&response) {
            self.set_cookie(Some(cookie));
        }

        if status == StatusCode::UNAUTHORIZED && on_401 == Unauthorized::SessionRejected {
            return Err(Error::Unauthenticated);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            if status == StatusCode::UNAUTHORIZED {
                return Err(Error::InvalidCredentials(message));
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Collapse `Set-Cookie` headers into a `Cookie` header value
fn session_cookie(response: &Response) -> Option<String> {
    let pairs: Vec<&str> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
