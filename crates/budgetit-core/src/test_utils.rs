//! Test utilities for budgetit-core
//!
//! In-process stand-ins for the two external services the client talks to:
//! a mock BudgetIt backend (users, expenses, budgets, goals, weekly
//! analytics, cookie sessions) and a mock generative-text server that
//! answers in the Gemini and Ollama wire shapes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Value};
use tokio::sync::oneshot;

const SESSION_COOKIE: &str = "session";

/// Start an axum app on an ephemeral port, shutting down when `rx` fires
async fn serve(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

// ========== Mock backend ==========

#[derive(Debug, Clone)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    user_type: String,
}

impl UserRow {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "userType": self.user_type,
        })
    }
}

#[derive(Debug, Clone)]
struct ExpenseRow {
    id: i64,
    user_id: i64,
    amount: f64,
    category: String,
    description: String,
    date: NaiveDate,
}

#[derive(Debug, Clone)]
struct BudgetRow {
    id: i64,
    user_id: i64,
    category: String,
    amount: f64,
    period: String,
}

#[derive(Debug, Clone)]
struct GoalRow {
    id: i64,
    user_id: i64,
    title: String,
    target_amount: f64,
    saved_amount: f64,
    target_date: String,
}

#[derive(Debug, Default)]
struct BackendState {
    users: Vec<UserRow>,
    sessions: HashMap<String, i64>,
    expenses: Vec<ExpenseRow>,
    budgets: Vec<BudgetRow>,
    goals: Vec<GoalRow>,
    next_id: i64,
}

impl BackendState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Open a session for `user_id`, returning the `Set-Cookie` value
    fn open_session(&mut self, user_id: i64) -> String {
        let token = format!("tok{}", self.next_id());
        self.sessions.insert(token.clone(), user_id);
        format!("{}={}; HttpOnly; Path=/", SESSION_COOKIE, token)
    }

    fn user(&self, id: i64) -> Option<&UserRow> {
        self.users.iter().find(|u| u.id == id)
    }
}

type Shared = Arc<Mutex<BackendState>>;

/// Mock BudgetIt backend
///
/// Serves the REST API under `/api` with the same status codes and `{error}`
/// bodies as the real backend. State lives in memory for the server's life.
pub struct MockBackendServer {
    addr: SocketAddr,
    state: Shared,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBackendServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));

        let app = Router::new()
            .route("/api/auth/signup", post(handle_signup))
            .route("/api/auth/signin", post(handle_signin))
            .route("/api/auth/logout", post(handle_logout))
            .route("/api/auth/me", get(handle_me))
            .route("/api/expenses", get(handle_list_expenses).post(handle_add_expense))
            .route("/api/budgets", get(handle_list_budgets).post(handle_set_budget))
            .route("/api/goals", get(handle_list_goals).post(handle_add_goal))
            .route("/api/analytics/weekly", get(handle_weekly_analytics))
            .with_state(state.clone());

        let (addr, shutdown_tx) = serve(app).await;

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// API base URL (including the `/api` prefix)
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Record a deposit towards a goal (the API has no endpoint for it)
    pub fn set_goal_saved(&self, goal_id: i64, saved_amount: f64) {
        let mut state = self.state.lock().unwrap();
        if let Some(goal) = state.goals.iter_mut().find(|g| g.id == goal_id) {
            goal.saved_amount = saved_amount;
        }
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn unauthenticated() -> Response {
    error(StatusCode::UNAUTHORIZED, "Not authenticated")
}

fn missing_fields() -> Response {
    error(StatusCode::BAD_REQUEST, "Missing required fields")
}

/// Resolve the session cookie to a user id
fn session_user(state: &BackendState, headers: &HeaderMap) -> Option<i64> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, token)| state.sessions.get(token).copied())
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Amounts may arrive as numbers or numeric strings; zero counts as missing
fn amount_field(body: &Value, key: &str) -> Option<f64> {
    let value = body.get(key)?;
    let amount = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))?;
    (amount != 0.0).then_some(amount)
}

fn with_session(cookie: String, status: StatusCode, body: Value) -> Response {
    (status, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

async fn handle_signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let (Some(name), Some(email), Some(password)) = (
        str_field(&body, "name"),
        str_field(&body, "email"),
        str_field(&body, "password"),
    ) else {
        return missing_fields();
    };
    let user_type = str_field(&body, "userType").unwrap_or("student");

    let mut state = state.lock().unwrap();
    if state.users.iter().any(|u| u.email == email) {
        return error(StatusCode::CONFLICT, "User already exists");
    }

    let user = UserRow {
        id: state.next_id(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        user_type: user_type.to_string(),
    };
    let cookie = state.open_session(user.id);
    let body = json!({ "message": "User created successfully", "user": user.to_json() });
    state.users.push(user);

    with_session(cookie, StatusCode::CREATED, body)
}

async fn handle_signin(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let (Some(email), Some(password)) = (str_field(&body, "email"), str_field(&body, "password"))
    else {
        return error(StatusCode::BAD_REQUEST, "Missing credentials");
    };

    let mut state = state.lock().unwrap();
    let Some(user) = state
        .users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .cloned()
    else {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let cookie = state.open_session(user.id);
    let body = json!({ "message": "Login successful", "user": user.to_json() });
    with_session(cookie, StatusCode::OK, body)
}

async fn handle_logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(user_id) = session_user(&state, &headers) {
        state.sessions.retain(|_, id| *id != user_id);
    }
    Json(json!({ "message": "Logged out successfully" })).into_response()
}

async fn handle_me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user) = session_user(&state, &headers).and_then(|id| state.user(id)) else {
        return unauthenticated();
    };
    Json(json!({ "user": user.to_json() })).into_response()
}

async fn handle_list_expenses(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };

    let mut rows: Vec<&ExpenseRow> = state
        .expenses
        .iter()
        .filter(|e| e.user_id == user_id)
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let body: Vec<Value> = rows
        .into_iter()
        .map(|e| {
            json!({
                "id": e.id,
                "amount": e.amount,
                "category": e.category,
                "description": e.description,
                "date": e.date.format("%Y-%m-%d").to_string(),
            })
        })
        .collect();
    Json(body).into_response()
}

async fn handle_add_expense(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };
    let (Some(amount), Some(category)) = (amount_field(&body, "amount"), str_field(&body, "category"))
    else {
        return missing_fields();
    };
    let date = match str_field(&body, "date") {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid date"),
        },
        None => Local::now().date_naive(),
    };

    let expense = ExpenseRow {
        id: state.next_id(),
        user_id,
        amount,
        category: category.to_string(),
        description: str_field(&body, "description").unwrap_or_default().to_string(),
        date,
    };
    let id = expense.id;
    state.expenses.push(expense);

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Expense added successfully" })),
    )
        .into_response()
}

async fn handle_list_budgets(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };
    let body: Vec<Value> = state
        .budgets
        .iter()
        .filter(|b| b.user_id == user_id)
        .map(|b| {
            json!({
                "id": b.id,
                "category": b.category,
                "amount": b.amount,
                "period": b.period,
            })
        })
        .collect();
    Json(body).into_response()
}

async fn handle_set_budget(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };
    let (Some(category), Some(amount)) = (str_field(&body, "category"), amount_field(&body, "amount"))
    else {
        return missing_fields();
    };
    let period = str_field(&body, "period").unwrap_or("weekly").to_string();

    // One budget per category: setting it again replaces the old row
    state
        .budgets
        .retain(|b| !(b.user_id == user_id && b.category == category));
    let budget = BudgetRow {
        id: state.next_id(),
        user_id,
        category: category.to_string(),
        amount,
        period,
    };
    state.budgets.push(budget);

    Json(json!({ "message": "Budget set successfully" })).into_response()
}

async fn handle_list_goals(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };
    let body: Vec<Value> = state
        .goals
        .iter()
        .filter(|g| g.user_id == user_id)
        .map(|g| {
            json!({
                "id": g.id,
                "title": g.title,
                "target_amount": g.target_amount,
                "saved_amount": g.saved_amount,
                "target_date": g.target_date,
            })
        })
        .collect();
    Json(body).into_response()
}

async fn handle_add_goal(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };
    let (Some(title), Some(target_amount), Some(target_date)) = (
        str_field(&body, "title"),
        amount_field(&body, "targetAmount"),
        str_field(&body, "targetDate"),
    ) else {
        return missing_fields();
    };

    let goal = GoalRow {
        id: state.next_id(),
        user_id,
        title: title.to_string(),
        target_amount,
        saved_amount: 0.0,
        target_date: target_date.to_string(),
    };
    let id = goal.id;
    state.goals.push(goal);

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Goal added successfully" })),
    )
        .into_response()
}

/// Last 7 days of spending per category against weekly budgets
async fn handle_weekly_analytics(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user_id) = session_user(&state, &headers) else {
        return unauthenticated();
    };

    let week_ago = Local::now().date_naive() - Duration::days(7);

    let mut expenses: HashMap<&str, f64> = HashMap::new();
    for e in state
        .expenses
        .iter()
        .filter(|e| e.user_id == user_id && e.date >= week_ago)
    {
        *expenses.entry(e.category.as_str()).or_insert(0.0) += e.amount;
    }

    let budgets: HashMap<&str, f64> = state
        .budgets
        .iter()
        .filter(|b| b.user_id == user_id && b.period == "weekly")
        .map(|b| (b.category.as_str(), b.amount))
        .collect();

    Json(json!({
        "expenses": expenses,
        "budgets": budgets,
        "period": "weekly",
    }))
    .into_response()
}

// ========== Mock generative-text server ==========

/// How the mock LLM answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmMode {
    /// Reply with `echo: <prompt>`
    Echo,
    /// Reply successfully but without any text
    Empty,
    /// Fail every request with 500
    Fail,
}

#[derive(Debug)]
struct LlmState {
    mode: LlmMode,
    prompts: Vec<String>,
}

type SharedLlm = Arc<Mutex<LlmState>>;

/// Mock LLM server speaking the Gemini and Ollama APIs
pub struct MockLlmServer {
    addr: SocketAddr,
    state: SharedLlm,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start an echoing server
    pub async fn start() -> Self {
        Self::start_with(LlmMode::Echo).await
    }

    pub async fn start_with(mode: LlmMode) -> Self {
        let state = Arc::new(Mutex::new(LlmState {
            mode,
            prompts: Vec::new(),
        }));

        let app = Router::new()
            // Gemini: the segment is `{model}` or `{model}:generateContent`
            .route(
                "/v1beta/models/:model",
                get(handle_gemini_model).post(handle_gemini_generate),
            )
            .route("/api/tags", get(handle_ollama_tags))
            .route("/api/generate", post(handle_ollama_generate))
            .with_state(state.clone());

        let (addr, shutdown_tx) = serve(app).await;

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().prompts.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Record the prompt; `Err` carries the failure response in `Fail` mode
fn llm_reply(state: &SharedLlm, prompt: String) -> Result<Option<String>, Response> {
    let mut state = state.lock().unwrap();
    let reply = match state.mode {
        LlmMode::Echo => Ok(Some(format!("echo: {}", prompt))),
        LlmMode::Empty => Ok(None),
        LlmMode::Fail => Err(error(StatusCode::INTERNAL_SERVER_ERROR, "model unavailable")),
    };
    state.prompts.push(prompt);
    reply
}

/// Gemini requests must carry the key in a header, never in the query string
fn gemini_key_error(headers: &HeaderMap, query: Option<&str>) -> Option<Response> {
    if query.is_some_and(|q| q.split('&').any(|pair| pair.starts_with("key="))) {
        return Some(error(StatusCode::BAD_REQUEST, "API key must not be in the URL"));
    }
    let has_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    (!has_key).then(|| error(StatusCode::FORBIDDEN, "API key required"))
}

async fn handle_gemini_model(
    Path(model): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = gemini_key_error(&headers, query.as_deref()) {
        return response;
    }
    Json(json!({ "name": format!("models/{}", model) })).into_response()
}

async fn handle_gemini_generate(
    State(state): State<SharedLlm>,
    Path(model): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(response) = gemini_key_error(&headers, query.as_deref()) {
        return response;
    }
    if !model.ends_with(":generateContent") {
        return error(StatusCode::NOT_FOUND, "unknown method");
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    match llm_reply(&state, prompt) {
        Ok(Some(text)) => Json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        }))
        .into_response(),
        Ok(None) => Json(json!({ "candidates": [] })).into_response(),
        Err(response) => response,
    }
}

async fn handle_ollama_tags() -> Json<Value> {
    Json(json!({ "models": [{ "name": "llama3.2:latest" }] }))
}

async fn handle_ollama_generate(
    State(state): State<SharedLlm>,
    Json(body): Json<Value>,
) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();

    match llm_reply(&state, prompt) {
        Ok(text) => Json(json!({
            "model": model,
            "response": text.unwrap_or_default(),
            "done": true,
        }))
        .into_response(),
        Err(response) => response,
    }
}
