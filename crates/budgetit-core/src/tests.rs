//! End-to-end tests against the in-process mock servers

use chrono::{Duration, Local};

use crate::chat::{ChatBackend, ChatClient, ChatSession, ASSISTANT_PERSONA, FALLBACK_REPLY};
use crate::dashboard::DashboardState;
use crate::insights::{generate_insights, FixedIndex, InsightKind, Notifier};
use crate::models::{
    BudgetPeriod, Category, NewBudget, NewExpense, NewGoal, SignupRequest, UserType,
};
use crate::session::{AuthState, Session, SessionStore};
use crate::test_utils::{LlmMode, MockBackendServer, MockLlmServer};
use crate::{ApiClient, Error, GeminiBackend, OllamaBackend};

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        name: "Asha".to_string(),
        email: email.to_string(),
        password: "hunter2".to_string(),
        user_type: UserType::Student,
    }
}

fn expense(amount: f64, category: Category) -> NewExpense {
    NewExpense {
        amount,
        category,
        description: None,
        date: None,
    }
}

fn weekly_budget(category: Category, amount: f64) -> NewBudget {
    NewBudget {
        category,
        amount,
        period: BudgetPeriod::Weekly,
    }
}

/// Signed-up client against a fresh mock backend
async fn signed_up_client(server: &MockBackendServer) -> ApiClient {
    let api = ApiClient::new(&server.url());
    api.signup(&signup_request("asha@example.com"))
        .await
        .unwrap();
    api
}

// ========== API client ==========

#[tokio::test]
async fn test_requests_without_session_are_unauthenticated() {
    let server = MockBackendServer::start().await;
    let api = ApiClient::new(&server.url());

    assert!(api.health_check().await);
    assert!(matches!(api.current_user().await, Err(Error::Unauthenticated)));
    assert!(matches!(api.list_expenses().await, Err(Error::Unauthenticated)));
    assert!(matches!(
        api.weekly_analytics().await,
        Err(Error::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_signup_sets_cookie_and_me_works() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    assert!(api.cookie().unwrap().starts_with("session="));
    let me = api.current_user().await.unwrap();
    assert_eq!(me.email, "asha@example.com");
    assert_eq!(me.user_type, UserType::Student);
}

#[tokio::test]
async fn test_api_errors_carry_backend_message() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    // Same email again
    let err = api
        .signup(&signup_request("asha@example.com"))
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "User already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Wrong password keeps the backend's reason instead of "Not authenticated"
    let other = ApiClient::new(&server.url());
    let err = other
        .signin(&crate::models::Credentials {
            email: "asha@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        Error::InvalidCredentials(message) => assert_eq!(message, "Invalid credentials"),
        unexpected => panic!("unexpected error: {unexpected:?}"),
    }
    assert!(other.cookie().is_none());

    // An expired session on a data endpoint is still Unauthenticated
    let stale = ApiClient::with_cookie(&server.url(), "session=gone");
    assert!(matches!(stale.current_user().await, Err(Error::Unauthenticated)));
}

#[tokio::test]
async fn test_expenses_budgets_goals_roundtrip() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    let first = api.add_expense(&expense(120.0, Category::Food)).await.unwrap();
    let second = api
        .add_expense(&NewExpense {
            description: Some("bus pass".to_string()),
            ..expense(40.0, Category::Transport)
        })
        .await
        .unwrap();
    assert_ne!(first, second);

    let expenses = api.list_expenses().await.unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|e| e.date.is_some()));

    api.set_budget(&weekly_budget(Category::Food, 500.0))
        .await
        .unwrap();
    // Setting the same category again replaces it
    api.set_budget(&weekly_budget(Category::Food, 600.0))
        .await
        .unwrap();
    let budgets = api.list_budgets().await.unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, 600.0);

    let target_date = Local::now().date_naive() + Duration::days(30);
    let goal_id = api
        .add_goal(&NewGoal {
            title: "Laptop".to_string(),
            target_amount: 50_000.0,
            target_date,
        })
        .await
        .unwrap();
    server.set_goal_saved(goal_id, 12_500.0);

    let goals = api.list_goals().await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].target_date, Some(target_date));
    assert!((goals[0].progress_percentage() - 25.0).abs() < 1e-9);
    assert_eq!(goals[0].days_remaining(Local::now().date_naive()), Some(30));
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    let err = api
        .add_expense(&expense(0.0, Category::Food))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_weekly_analytics_window_and_period() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    api.add_expense(&expense(100.0, Category::Food)).await.unwrap();
    api.add_expense(&expense(50.0, Category::Food)).await.unwrap();
    api.add_expense(&NewExpense {
        date: Some(Local::now().date_naive() - Duration::days(30)),
        ..expense(999.0, Category::Food)
    })
    .await
    .unwrap();
    api.set_budget(&weekly_budget(Category::Food, 200.0))
        .await
        .unwrap();
    api.set_budget(&NewBudget {
        category: Category::Rent,
        amount: 8000.0,
        period: BudgetPeriod::Monthly,
    })
    .await
    .unwrap();

    let analytics = api.weekly_analytics().await.unwrap();
    assert_eq!(analytics.period.as_deref(), Some("weekly"));
    assert_eq!(analytics.expenses.get("food"), Some(&150.0));
    assert_eq!(analytics.budgets.get("food"), Some(&200.0));
    assert!(!analytics.budgets.contains_key("rent"));
}

// ========== Insights from live data ==========

#[tokio::test]
async fn test_overspending_flow_produces_warnings() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;

    api.set_budget(&weekly_budget(Category::Food, 300.0))
        .await
        .unwrap();
    api.set_budget(&weekly_budget(Category::Transport, 200.0))
        .await
        .unwrap();
    api.add_expense(&expense(290.0, Category::Food)).await.unwrap();
    api.add_expense(&expense(190.0, Category::Transport))
        .await
        .unwrap();

    let snapshot = api.weekly_snapshot().await.unwrap();
    let insights = generate_insights(&snapshot);

    // 480 / 500 = 96%
    assert_eq!(insights[0].kind, InsightKind::Warning);
    assert_eq!(insights.len(), 3);
    assert!(insights[1..].iter().all(|i| i.kind == InsightKind::Warning));
    assert!(insights.iter().any(|i| i.title == "Food Alert"));
    assert!(insights.iter().any(|i| i.title == "Transport Alert"));
}

#[tokio::test]
async fn test_notification_for_new_expense_clears_after_display_time() {
    let server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;
    api.add_expense(&expense(10.0, Category::Food)).await.unwrap();

    let mut dashboard = DashboardState::new();
    assert_eq!(dashboard.refresh(&api).await, 0);

    let notifier = Notifier::new(std::time::Duration::from_millis(50));
    let shown = notifier
        .show_random(&dashboard.insights(), &mut FixedIndex(0))
        .unwrap();
    // No budget at all: the only insight is the celebration
    assert_eq!(shown.kind, InsightKind::Celebration);
    assert_eq!(notifier.current(), Some(shown));

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(notifier.current().is_none());
}

// ========== Dashboard ==========

#[tokio::test]
async fn test_dashboard_refresh_and_stale_on_error() {
    let mut server = MockBackendServer::start().await;
    let api = signed_up_client(&server).await;
    api.set_budget(&weekly_budget(Category::Food, 1000.0))
        .await
        .unwrap();
    api.add_expense(&expense(900.0, Category::Food)).await.unwrap();

    let mut dashboard = DashboardState::new();
    assert_eq!(dashboard.refresh(&api).await, 0);
    assert_eq!(dashboard.expenses.len(), 1);
    assert_eq!(dashboard.budgets.len(), 1);

    // 900 / 1000 is exactly 90%: Info, and the category is not above 90%
    let insights = dashboard.insights();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, InsightKind::Info);

    let rows = dashboard.category_rows();
    assert_eq!(rows[0].category, "food");
    assert!((rows[0].percentage - 90.0).abs() < 1e-9);

    server.stop();
    // Give the graceful shutdown a moment to close the listener
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Fresh client so no pooled connection outlives the server
    let api = ApiClient::with_cookie(&server.url(), &api.cookie().unwrap());
    let before = dashboard.analytics.clone();
    let failures = dashboard.refresh(&api).await;
    assert_eq!(failures, 4);
    assert_eq!(dashboard.analytics, before);
    assert_eq!(dashboard.expenses.len(), 1);
}

// ========== Session ==========

#[tokio::test]
async fn test_session_login_persist_restore_logout() {
    let server = MockBackendServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    let mut session = Session::anonymous(ApiClient::new(&server.url()), store.clone());
    let user = session
        .signup(&signup_request("ravi@example.com"))
        .await
        .unwrap();
    assert_eq!(session.state(), &AuthState::Authenticated(user.clone()));
    assert!(store.load().unwrap().is_some());

    // A fresh process picks the login back up
    let restored = Session::restore(ApiClient::new(&server.url()), store.clone()).await;
    assert_eq!(restored.user(), Some(&user));

    session.logout().await.unwrap();
    assert!(!session.is_authenticated());
    assert!(store.load().unwrap().is_none());

    let mut again = Session::anonymous(ApiClient::new(&server.url()), store.clone());
    again.login("ravi@example.com", "hunter2").await.unwrap();
    assert!(again.is_authenticated());
}

#[tokio::test]
async fn test_restore_with_expired_cookie_clears_file() {
    let server = MockBackendServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    store
        .save(&crate::session::StoredSession {
            cookie: "session=forged".to_string(),
            user: None,
        })
        .unwrap();

    let session = Session::restore(ApiClient::new(&server.url()), store.clone()).await;
    assert_eq!(session.state(), &AuthState::Anonymous);
    assert!(store.load().unwrap().is_none());
    assert_eq!(server.session_count(), 0);
}

// ========== Chat backends ==========

#[tokio::test]
async fn test_gemini_backend_against_mock() {
    let server = MockLlmServer::start().await;
    let backend = GeminiBackend::with_host(&server.url(), "test-key", "gemini-2.0-flash");

    assert!(backend.health_check().await);
    let reply = backend.generate("hello").await.unwrap();
    assert_eq!(reply.as_deref(), Some("echo: hello"));
}

#[tokio::test]
async fn test_gemini_key_travels_in_header() {
    let server = MockLlmServer::start().await;

    // The mock refuses requests without the key header
    let keyless = GeminiBackend::with_host(&server.url(), "", "gemini-2.0-flash");
    assert!(!keyless.health_check().await);
    assert!(matches!(
        keyless.generate("hello").await,
        Err(Error::Api { status: 403, .. })
    ));
    assert!(server.prompts().is_empty());
}

#[tokio::test]
async fn test_ollama_backend_against_mock() {
    let server = MockLlmServer::start().await;

    let ollama = OllamaBackend::new(&server.url(), "llama3.2");
    assert!(ollama.health_check().await);
    assert_eq!(
        ollama.generate("hi").await.unwrap().as_deref(),
        Some("echo: hi")
    );
    assert_eq!(
        ollama.generate("hey").await.unwrap().as_deref(),
        Some("echo: hey")
    );
    assert_eq!(server.prompts(), vec!["hi", "hey"]);
}

#[tokio::test]
async fn test_empty_and_failing_llm_replies() {
    let server = MockLlmServer::start_with(LlmMode::Empty).await;
    let gemini = GeminiBackend::with_host(&server.url(), "k", "gemini-2.0-flash");
    assert_eq!(gemini.generate("x").await.unwrap(), None);
    let ollama = OllamaBackend::new(&server.url(), "llama3.2");
    assert_eq!(ollama.generate("x").await.unwrap(), None);

    let server = MockLlmServer::start_with(LlmMode::Fail).await;
    let gemini = GeminiBackend::with_host(&server.url(), "k", "gemini-2.0-flash");
    assert!(matches!(
        gemini.generate("x").await,
        Err(Error::Api { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_chat_session_sends_persona_prompt() {
    let server = MockLlmServer::start().await;
    let client = ChatClient::Gemini(GeminiBackend::with_host(
        &server.url(),
        "k",
        "gemini-2.0-flash",
    ));
    let chat = ChatSession::new(client);

    let reply = chat.send("How to save more money?").await.unwrap().unwrap();
    let expected_prompt = format!("{}How to save more money?", ASSISTANT_PERSONA);
    assert_eq!(server.prompts(), vec![expected_prompt.clone()]);
    assert_eq!(reply.text, format!("echo: {}", expected_prompt));
}

#[tokio::test]
async fn test_chat_session_empty_reply_uses_fallback() {
    let server = MockLlmServer::start_with(LlmMode::Empty).await;
    let chat = ChatSession::new(ChatClient::Ollama(OllamaBackend::new(
        &server.url(),
        "llama3.2",
    )));

    let reply = chat.send("anything").await.unwrap().unwrap();
    assert_eq!(reply.text, FALLBACK_REPLY);
}
