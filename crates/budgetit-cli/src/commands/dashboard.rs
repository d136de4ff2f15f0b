//! Dashboard and insight command implementations

use std::time::Duration;

use anyhow::{bail, Context, Result};
use budgetit_core::{
    generate_insights, models::title_case, pick_notification, ApiClient, DashboardState,
    Notification, Notifier, RandomSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{print_insight, print_notification, rupees, truncate};

/// Seeded generator when a seed is given, thread-local entropy otherwise
fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}

/// After an expense or budget change, surface one random insight
///
/// Best effort: the change already succeeded, so failures are only logged.
pub async fn notify_after_change(api: &ApiClient) {
    let snapshot = match api.weekly_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping insight notification");
            return;
        }
    };

    let insights = generate_insights(&snapshot);
    if let Some(insight) = pick_notification(&insights, random_source(None).as_mut()) {
        print_notification(insight.kind, &insight.title, &insight.message);
    }
}

pub async fn cmd_dashboard(
    api: &ApiClient,
    notify_for: Option<Duration>,
    seed: Option<u64>,
) -> Result<()> {
    let mut state = DashboardState::new();
    let failures = state.refresh(api).await;
    if state.analytics.is_none() {
        bail!(
            "Could not load weekly analytics from {} ({} requests failed)",
            api.base_url(),
            failures
        );
    }

    let totals = state.totals();

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 BudgetIt Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total Spent:     {}", rupees(totals.total_spent));
    println!("  Total Budget:    {}", rupees(totals.total_budget));
    if totals.remaining >= 0.0 {
        println!("  Remaining:       \x1b[32m{}\x1b[0m", rupees(totals.remaining));
    } else {
        println!("  Remaining:       \x1b[31m{}\x1b[0m", rupees(totals.remaining));
    }
    println!("  Budget Used:     {:.1}%", totals.spending_percentage);

    let rows = state.category_rows();
    if !rows.is_empty() {
        println!();
        println!("  📊 Budget vs Actual");
        println!("     ─────────────────────────────────────────");
        for row in &rows {
            let budget = if row.budget > 0.0 {
                format!("{} ({:.0}%)", rupees(row.budget), row.percentage)
            } else {
                "no budget".to_string()
            };
            println!(
                "     {:<13} {:>8} of {}",
                title_case(&row.category),
                rupees(row.spent),
                budget
            );
        }

        println!();
        println!("  🥧 Spending by Category");
        println!("     ─────────────────────────────────────────");
        for share in state.spending_shares() {
            println!(
                "     {:<13} {:>5.1}%",
                title_case(&share.category),
                share.percentage
            );
        }
    }

    let recent = state.recent_expenses();
    if !recent.is_empty() {
        println!();
        println!("  🧾 Recent Expenses");
        println!("     ─────────────────────────────────────────");
        for expense in recent {
            println!(
                "     {:>8}  {:<13} {}",
                rupees(expense.amount),
                title_case(&expense.category),
                truncate(expense.description.as_deref().unwrap_or(""), 30)
            );
        }
    }

    if !state.goals.is_empty() {
        println!();
        println!("  🏆 Goals: {} (run 'budgetit goals' for details)", state.goals.len());
    }

    let insights = state.insights();
    println!();
    println!("  🤖 AI Insights");
    println!("     ─────────────────────────────────────────");
    for insight in &insights {
        print_insight(insight);
    }
    println!();

    if failures > 0 {
        println!(
            "  ⚠️  {} section(s) could not be refreshed; showing what loaded.",
            failures
        );
    }

    if let Some(display_for) = notify_for {
        let notifier = Notifier::new(display_for);
        let shown: Option<Notification> = {
            let mut rng = random_source(seed);
            notifier.show_random(&insights, rng.as_mut())
        };
        if let Some(notification) = shown {
            print_notification(notification.kind, &notification.title, &notification.message);
            tokio::time::sleep(display_for).await;
            tracing::debug!(
                visible = notifier.current().is_some(),
                "Notification display time elapsed"
            );
        }
    }

    Ok(())
}

pub async fn cmd_insights(api: &ApiClient, json: bool) -> Result<()> {
    let snapshot = api
        .weekly_snapshot()
        .await
        .context("Failed to fetch weekly analytics")?;
    let insights = generate_insights(&snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!();
    println!("🤖 AI Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in &insights {
        print_insight(insight);
    }
    Ok(())
}
