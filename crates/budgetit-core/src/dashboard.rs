//! Dashboard view model
//!
//! Derives everything the dashboard shows from the weekly analytics plus the
//! user's expenses, budgets, and goals. [`DashboardState::refresh`] fetches
//! all four concurrently; a failed fetch keeps the previous value so one
//! flaky endpoint does not blank the screen.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::insights::{generate_insights, Insight};
use crate::models::{Budget, CategorySnapshot, Expense, Goal, Totals};

/// Number of expenses shown in the "recent" list
pub const RECENT_EXPENSES: usize = 5;

/// Budget vs. actual for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub spent: f64,
    /// 0 when the category has no weekly budget
    pub budget: f64,
    /// Spent as a percentage of budget (0 without a budget)
    pub percentage: f64,
}

/// One slice of the spending breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Share of total spending
    pub percentage: f64,
}

/// One row per category that has spending, sorted by category name
pub fn category_rows(snapshot: &CategorySnapshot) -> Vec<CategoryRow> {
    let mut rows: Vec<CategoryRow> = snapshot
        .spent
        .iter()
        .map(|(category, &spent)| {
            let budget = snapshot.budget_for(category);
            CategoryRow {
                category: category.clone(),
                spent,
                budget,
                percentage: if budget > 0.0 {
                    (spent / budget) * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}

/// Spending split by category, largest first
pub fn spending_shares(snapshot: &CategorySnapshot) -> Vec<CategoryShare> {
    let total: f64 = snapshot.spent.values().sum();
    let mut shares: Vec<CategoryShare> = snapshot
        .spent
        .iter()
        .map(|(category, &amount)| CategoryShare {
            category: category.clone(),
            amount,
            percentage: if total > 0.0 {
                (amount / total) * 100.0
            } else {
                0.0
            },
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

/// Everything the dashboard displays
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// `None` until the first successful analytics fetch
    pub analytics: Option<CategorySnapshot>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch analytics, expenses, budgets, and goals concurrently
    ///
    /// Each part is replaced only when its fetch succeeds. Returns the number
    /// of fetches that failed.
    pub async fn refresh(&mut self, api: &ApiClient) -> usize {
        let (analytics, expenses, budgets, goals) = tokio::join!(
            api.weekly_snapshot(),
            api.list_expenses(),
            api.list_budgets(),
            api.list_goals(),
        );

        let mut failures = 0;

        match analytics {
            Ok(snapshot) => self.analytics = Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Failed to fetch analytics, keeping previous");
                failures += 1;
            }
        }
        match expenses {
            Ok(expenses) => self.expenses = expenses,
            Err(e) => {
                warn!(error = %e, "Failed to fetch expenses, keeping previous");
                failures += 1;
            }
        }
        match budgets {
            Ok(budgets) => self.budgets = budgets,
            Err(e) => {
                warn!(error = %e, "Failed to fetch budgets, keeping previous");
                failures += 1;
            }
        }
        match goals {
            Ok(goals) => self.goals = goals,
            Err(e) => {
                warn!(error = %e, "Failed to fetch goals, keeping previous");
                failures += 1;
            }
        }

        debug!(failures, "Dashboard refreshed");
        failures
    }

    /// Insights for the current analytics (empty before the first fetch)
    pub fn insights(&self) -> Vec<Insight> {
        self.analytics
            .as_ref()
            .map(generate_insights)
            .unwrap_or_default()
    }

    /// Totals for the current analytics (all zero before the first fetch)
    pub fn totals(&self) -> Totals {
        self.analytics
            .as_ref()
            .map(CategorySnapshot::totals)
            .unwrap_or_default()
    }

    pub fn category_rows(&self) -> Vec<CategoryRow> {
        self.analytics
            .as_ref()
            .map(category_rows)
            .unwrap_or_default()
    }

    pub fn spending_shares(&self) -> Vec<CategoryShare> {
        self.analytics
            .as_ref()
            .map(spending_shares)
            .unwrap_or_default()
    }

    /// The most recent expenses, newest first as the backend returns them
    pub fn recent_expenses(&self) -> &[Expense] {
        let end = self.expenses.len().min(RECENT_EXPENSES);
        &self.expenses[..end]
    }
}
