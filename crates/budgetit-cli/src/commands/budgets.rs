//! Budget command implementations

use anyhow::{Context, Result};
use budgetit_core::{models::title_case, ApiClient, BudgetPeriod, Category, NewBudget};

use super::dashboard::notify_after_change;
use super::rupees;

pub async fn cmd_budgets_list(api: &ApiClient) -> Result<()> {
    let budgets = api.list_budgets().await.context("Failed to fetch budgets")?;

    if budgets.is_empty() {
        println!("No budgets set. Set one with:");
        println!("  budgetit budgets set --category food --amount 2000");
        return Ok(());
    }

    println!();
    println!("🎯 Budgets");
    println!("   ─────────────────────────────");

    for budget in &budgets {
        println!(
            "   {:<13} {:>8} / {}",
            title_case(&budget.category),
            rupees(budget.amount),
            budget.period
        );
    }

    Ok(())
}

pub async fn cmd_budgets_set(
    api: &ApiClient,
    category: Category,
    amount: f64,
    period: BudgetPeriod,
) -> Result<()> {
    let budget = NewBudget {
        category,
        amount,
        period,
    };
    api.set_budget(&budget)
        .await
        .context("Failed to set budget")?;

    println!(
        "✓ {} budget set to {} ({})",
        category.display_name(),
        rupees(amount),
        period
    );

    notify_after_change(api).await;
    Ok(())
}
