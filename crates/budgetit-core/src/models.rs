//! Domain models for BudgetIt
//!
//! These mirror the JSON shapes of the BudgetIt backend. Every field that the
//! backend might omit deserializes with a default so partial responses are
//! tolerated rather than rejected.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Spending categories offered by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Rent,
    Entertainment,
    Utilities,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Rent => "rent",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Rent,
            Self::Entertainment,
            Self::Utilities,
            Self::Other,
        ]
    }

    /// Title-cased name for display ("food" -> "Food")
    pub fn display_name(&self) -> String {
        title_case(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "rent" => Ok(Self::Rent),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upper-case the first character, leave the rest untouched
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Kind of account a user signed up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Professional,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "professional" => Ok(Self::Professional),
            _ => Err(format!("Unknown user type: {}", s)),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "userType", default)]
    pub user_type: UserType,
}

/// Sign-up request body
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

/// Sign-in request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A recorded expense
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Expense to be created
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    /// Backend stores an empty description when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Backend uses today's date when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-category budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// Budget to be set (replaces any existing budget for the category)
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub category: Category,
    pub amount: f64,
    pub period: BudgetPeriod,
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub target_amount: f64,
    #[serde(default)]
    pub saved_amount: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl Goal {
    /// Saved amount as a percentage of the target, capped at 100
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.saved_amount / self.target_amount * 100.0).min(100.0)
    }

    /// Whole days from `today` until the target date (negative once passed)
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.target_date
            .map(|target| target.signed_duration_since(today).num_days())
    }
}

/// Goal to be created
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub target_amount: f64,
    pub target_date: NaiveDate,
}

/// Response of `GET /analytics/weekly`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAnalytics {
    #[serde(default)]
    pub expenses: HashMap<String, f64>,
    #[serde(default)]
    pub budgets: HashMap<String, f64>,
    #[serde(default)]
    pub period: Option<String>,
}

impl From<WeeklyAnalytics> for CategorySnapshot {
    fn from(analytics: WeeklyAnalytics) -> Self {
        Self {
            spent: analytics.expenses,
            budget: analytics.budgets,
        }
    }
}

/// Point-in-time read of per-category spend and budget figures
///
/// Keys are category names as the backend reports them. The two sides need
/// not cover the same categories; a missing entry reads as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySnapshot {
    pub spent: HashMap<String, f64>,
    pub budget: HashMap<String, f64>,
}

impl CategorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for setting the spend of a category
    pub fn with_spent(mut self, category: impl Into<String>, amount: f64) -> Self {
        self.spent.insert(category.into(), amount);
        self
    }

    /// Builder-style helper for setting the budget of a category
    pub fn with_budget(mut self, category: impl Into<String>, amount: f64) -> Self {
        self.budget.insert(category.into(), amount);
        self
    }

    pub fn spent_for(&self, category: &str) -> f64 {
        self.spent.get(category).copied().unwrap_or(0.0)
    }

    pub fn budget_for(&self, category: &str) -> f64 {
        self.budget.get(category).copied().unwrap_or(0.0)
    }

    pub fn totals(&self) -> Totals {
        Totals::from_snapshot(self)
    }
}

/// Aggregates derived from a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_spent: f64,
    pub total_budget: f64,
    pub remaining: f64,
    /// Spent as a percentage of budget; 0 when there is no budget
    pub spending_percentage: f64,
}

impl Totals {
    pub fn from_snapshot(snapshot: &CategorySnapshot) -> Self {
        let total_spent: f64 = snapshot.spent.values().sum();
        let total_budget: f64 = snapshot.budget.values().sum();
        let spending_percentage = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };

        Self {
            total_spent,
            total_budget,
            remaining: total_budget - total_spent,
            spending_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(Category::from_str("Food").unwrap(), Category::Food);
        assert_eq!(Category::from_str(" utilities ").unwrap(), Category::Utilities);
        assert!(Category::from_str("groceries").is_err());
        assert_eq!(Category::Entertainment.display_name(), "Entertainment");
        assert_eq!(Category::all().len(), 6);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("food"), "Food");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("x"), "X");
    }

    #[test]
    fn test_totals() {
        let snapshot = CategorySnapshot::new()
            .with_spent("food", 300.0)
            .with_spent("rent", 200.0)
            .with_budget("food", 400.0)
            .with_budget("utilities", 600.0);

        let totals = snapshot.totals();
        assert_eq!(totals.total_spent, 500.0);
        assert_eq!(totals.total_budget, 1000.0);
        assert_eq!(totals.remaining, 500.0);
        assert_eq!(totals.spending_percentage, 50.0);
    }

    #[test]
    fn test_totals_zero_budget() {
        let snapshot = CategorySnapshot::new().with_spent("food", 120.0);
        let totals = snapshot.totals();
        assert_eq!(totals.spending_percentage, 0.0);
        assert_eq!(totals.remaining, -120.0);
    }

    #[test]
    fn test_user_deserialize() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "name": "Asha", "email": "asha@example.com", "userType": "professional"}"#,
        )
        .unwrap();
        assert_eq!(user.user_type, UserType::Professional);

        // userType missing defaults to student
        let user: User = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(user.user_type, UserType::Student);
        assert!(user.name.is_empty());
    }

    #[test]
    fn test_expense_tolerates_partial_rows() {
        let expense: Expense = serde_json::from_str(
            r#"{"id": 3, "amount": 12.5, "category": "food", "description": null, "date": "2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(expense.description, None);
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 1));

        let expense: Expense = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(expense.amount, 0.0);
        assert!(expense.category.is_empty());
    }

    #[test]
    fn test_new_goal_serializes_camel_case() {
        let goal = NewGoal {
            title: "Laptop".to_string(),
            target_amount: 56000.0,
            target_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["targetAmount"], 56000.0);
        assert_eq!(json["targetDate"], "2025-06-01");
    }

    #[test]
    fn test_new_expense_omits_optional_fields() {
        let expense = NewExpense {
            amount: 40.0,
            category: Category::Transport,
            description: None,
            date: None,
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["category"], "transport");
        assert!(json.get("description").is_none());
        assert!(json.get("date").is_none());
    }

    #[test]
    fn test_goal_progress() {
        let goal = Goal {
            id: 1,
            title: "Trip".to_string(),
            target_amount: 1000.0,
            saved_amount: 250.0,
            target_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        };
        assert_eq!(goal.progress_percentage(), 25.0);

        let overshoot = Goal {
            saved_amount: 1500.0,
            ..goal.clone()
        };
        assert_eq!(overshoot.progress_percentage(), 100.0);

        let no_target = Goal {
            target_amount: 0.0,
            ..goal
        };
        assert_eq!(no_target.progress_percentage(), 0.0);
    }

    #[test]
    fn test_goal_days_remaining() {
        let goal = Goal {
            id: 1,
            title: "Trip".to_string(),
            target_amount: 1000.0,
            saved_amount: 0.0,
            target_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        assert_eq!(goal.days_remaining(today), Some(10));

        let later = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        assert_eq!(goal.days_remaining(later), Some(-2));
    }

    #[test]
    fn test_analytics_into_snapshot() {
        let analytics: WeeklyAnalytics = serde_json::from_str(
            r#"{"expenses": {"food": 450}, "budgets": {"food": 500, "rent": 0}, "period": "weekly"}"#,
        )
        .unwrap();
        let snapshot = CategorySnapshot::from(analytics);
        assert_eq!(snapshot.spent_for("food"), 450.0);
        assert_eq!(snapshot.budget_for("rent"), 0.0);
        assert_eq!(snapshot.spent_for("rent"), 0.0);

        let empty: WeeklyAnalytics = serde_json::from_str("{}").unwrap();
        assert!(CategorySnapshot::from(empty).spent.is_empty());
    }
}
