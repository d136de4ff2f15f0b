//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `auth` - Account commands (signup, signin, logout, whoami) and session helpers
//! - `budgets` - Budget commands (list, set)
//! - `chat` - Budget assistant (one-shot and interactive)
//! - `dashboard` - Dashboard and insights
//! - `expenses` - Expense commands (list, add)
//! - `goals` - Savings goal commands (list, add)

pub mod auth;
pub mod budgets;
pub mod chat;
pub mod dashboard;
pub mod expenses;
pub mod goals;

// Re-export command functions for main.rs
pub use auth::*;
pub use budgets::*;
pub use chat::*;
pub use dashboard::*;
pub use expenses::*;
pub use goals::*;

use budgetit_core::{Insight, InsightKind};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a rupee amount without decimals
pub fn rupees(amount: f64) -> String {
    format!("₹{:.0}", amount)
}

/// ANSI colour for an insight kind
fn kind_color(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Warning => "\x1b[31m",     // Red
        InsightKind::Info => "\x1b[33m",        // Yellow
        InsightKind::Success => "\x1b[32m",     // Green
        InsightKind::Celebration => "\x1b[35m", // Magenta
    }
}

/// Print one insight with its tip and quote
pub fn print_insight(insight: &Insight) {
    println!(
        "   {}{}\x1b[0m",
        kind_color(insight.kind),
        insight.title
    );
    println!("      {}", insight.message);
    if let Some(tip) = &insight.tip {
        println!("      {}", tip);
    }
    if let Some(quote) = &insight.quote {
        println!("      \x1b[2m{}\x1b[0m", quote);
    }
}

/// Print a short notification box
pub fn print_notification(kind: InsightKind, title: &str, message: &str) {
    println!();
    println!(
        "   {}🤖 AI Insight [{}]\x1b[0m {}",
        kind_color(kind),
        kind,
        title
    );
    println!("      {}", message);
}
