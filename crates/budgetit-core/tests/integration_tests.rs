//! Integration tests for budgetit-core
//!
//! These tests exercise the analytics → insights → notification workflow
//! through the public API, starting from backend-shaped JSON.

use std::time::Duration;

use budgetit_core::{
    config::Config,
    dashboard::{category_rows, spending_shares},
    generate_insights, pick_notification, CategorySnapshot, ChatClient, ChatSession, FixedIndex,
    InsightKind, Notifier, SpendingBand, WeeklyAnalytics,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn analytics(json: &str) -> CategorySnapshot {
    serde_json::from_str::<WeeklyAnalytics>(json)
        .expect("analytics JSON should parse")
        .into()
}

// =============================================================================
// Insight workflow
// =============================================================================

#[test]
fn test_student_week_overspending() {
    let snapshot = analytics(
        r#"{
            "expenses": {"food": 2400, "transport": 300, "entertainment": 900},
            "budgets": {"food": 2000, "transport": 500, "entertainment": 1000},
            "period": "weekly"
        }"#,
    );

    let totals = snapshot.totals();
    assert_eq!(totals.total_spent, 3600.0);
    assert_eq!(totals.total_budget, 3500.0);
    assert_eq!(
        SpendingBand::from_percentage(totals.spending_percentage),
        SpendingBand::Overspending
    );

    let insights = generate_insights(&snapshot);
    assert_eq!(insights[0].kind, InsightKind::Warning);
    assert!(insights[0].message.contains("₹3600"));

    // food is at 120%, entertainment at exactly 90% (not above)
    let alerts: Vec<&str> = insights[1..].iter().map(|i| i.title.as_str()).collect();
    assert_eq!(alerts, vec!["Food Alert"]);

    let rows = category_rows(&snapshot);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].category, "entertainment");
}

#[test]
fn test_frugal_week_celebrates() {
    let snapshot = analytics(
        r#"{"expenses": {"food": 400}, "budgets": {"food": 2000, "rent": 1000}}"#,
    );

    let insights = generate_insights(&snapshot);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, InsightKind::Celebration);
    assert!(insights[0].tip.is_some());
    assert!(insights[0].quote.is_some());
}

#[test]
fn test_partial_analytics_tolerated() {
    // No budgets at all: percentage is 0, which celebrates
    let snapshot = analytics(r#"{"expenses": {"food": 120}}"#);
    let insights = generate_insights(&snapshot);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, InsightKind::Celebration);

    let shares = spending_shares(&snapshot);
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].percentage, 100.0);
}

#[test]
fn test_seeded_notification_is_reproducible() {
    let snapshot = analytics(
        r#"{
            "expenses": {"food": 950, "transport": 480, "rent": 100},
            "budgets": {"food": 1000, "transport": 500, "rent": 5000}
        }"#,
    );
    let insights = generate_insights(&snapshot);
    assert_eq!(insights.len(), 3);

    let first = pick_notification(&insights, &mut StdRng::seed_from_u64(7)).cloned();
    let second = pick_notification(&insights, &mut StdRng::seed_from_u64(7)).cloned();
    assert_eq!(first, second);
    assert!(first.is_some());

    let pinned = pick_notification(&insights, &mut FixedIndex(0)).unwrap();
    assert_eq!(pinned, &insights[0]);
}

#[tokio::test(start_paused = true)]
async fn test_notification_lifecycle() {
    let snapshot = analytics(r#"{"expenses": {"food": 800}, "budgets": {"food": 1000}}"#);
    let insights = generate_insights(&snapshot);

    let notifier = Notifier::default();
    let shown = notifier
        .show_random(&insights, &mut FixedIndex(0))
        .expect("one insight is always produced");
    assert_eq!(shown.kind, InsightKind::Info);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(notifier.current().is_some());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(notifier.current().is_none());
}

// =============================================================================
// Configuration and chat
// =============================================================================

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "api_url = \"http://budget.local:8000/api/\"\nnotification_secs = 8\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.api_url, "http://budget.local:8000/api");
    assert_eq!(config.notification_duration, Duration::from_secs(8));
    assert!(config.session_path().ends_with("session.json"));
}

#[tokio::test]
async fn test_mock_chat_conversation() {
    let chat = ChatSession::new(ChatClient::mock());

    let reply = chat
        .send("I want to buy a laptop")
        .await
        .unwrap()
        .expect("non-empty input gets a reply");
    assert!(reply.text.contains("laptop"));
    assert_eq!(chat.messages().len(), 3);
}
