//! Expense command implementations

use anyhow::{Context, Result};
use budgetit_core::{models::title_case, ApiClient, Category, NewExpense};
use chrono::NaiveDate;

use super::dashboard::notify_after_change;
use super::{rupees, truncate};

pub async fn cmd_expenses_list(api: &ApiClient, limit: usize) -> Result<()> {
    let expenses = api
        .list_expenses()
        .await
        .context("Failed to fetch expenses")?;

    if expenses.is_empty() {
        println!("No expenses yet. Add one with:");
        println!("  budgetit expenses add --amount 250 --category food");
        return Ok(());
    }

    println!();
    println!("💸 Recent Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses.iter().take(limit) {
        let date = expense
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        let description = expense.description.as_deref().unwrap_or("");
        println!(
            "   {} │ {:>8} │ {:<13} │ {}",
            date,
            rupees(expense.amount),
            title_case(&expense.category),
            truncate(description, 36)
        );
    }

    if expenses.len() > limit {
        println!("   ... and {} more", expenses.len() - limit);
    }

    Ok(())
}

pub async fn cmd_expenses_add(
    api: &ApiClient,
    amount: f64,
    category: Category,
    description: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let expense = NewExpense {
        amount,
        category,
        description,
        date,
    };
    let id = api
        .add_expense(&expense)
        .await
        .context("Failed to add expense")?;

    println!(
        "✓ Added expense #{}: {} on {}",
        id,
        rupees(amount),
        category.display_name()
    );

    notify_after_change(api).await;
    Ok(())
}
