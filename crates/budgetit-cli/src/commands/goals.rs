//! Savings goal command implementations

use anyhow::{Context, Result};
use budgetit_core::{ApiClient, Goal, NewGoal};
use chrono::{Local, NaiveDate};

use super::{rupees, truncate};

const PROGRESS_BAR_WIDTH: usize = 20;

fn progress_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// "⏰ N days remaining" until the target date, then "🎉 Target date reached!"
pub fn deadline_label(goal: &Goal, today: NaiveDate) -> String {
    match goal.days_remaining(today) {
        Some(days) if days > 0 => format!("⏰ {} days remaining", days),
        Some(_) => "🎉 Target date reached!".to_string(),
        None => "no target date".to_string(),
    }
}

pub async fn cmd_goals_list(api: &ApiClient) -> Result<()> {
    let goals = api.list_goals().await.context("Failed to fetch goals")?;

    if goals.is_empty() {
        println!("No goals yet. Add one with:");
        println!("  budgetit goals add --title Laptop --target-amount 50000 --target-date 2026-12-31");
        return Ok(());
    }

    let today = Local::now().date_naive();

    println!();
    println!("🏆 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for goal in &goals {
        let progress = goal.progress_percentage();
        println!("   {}", truncate(&goal.title, 40));
        println!(
            "      {} {:.1}%  {} / {}",
            progress_bar(progress),
            progress,
            rupees(goal.saved_amount),
            rupees(goal.target_amount)
        );
        println!(
            "      💸 Still needed: {}  {}",
            rupees((goal.target_amount - goal.saved_amount).max(0.0)),
            deadline_label(goal, today)
        );
    }

    Ok(())
}

pub async fn cmd_goals_add(
    api: &ApiClient,
    title: &str,
    target_amount: f64,
    target_date: NaiveDate,
) -> Result<()> {
    let goal = NewGoal {
        title: title.to_string(),
        target_amount,
        target_date,
    };
    let id = api.add_goal(&goal).await.context("Failed to add goal")?;

    println!(
        "✓ Added goal #{}: {} ({} by {})",
        id,
        title,
        rupees(target_amount),
        target_date
    );
    Ok(())
}
