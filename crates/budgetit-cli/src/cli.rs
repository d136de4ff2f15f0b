//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use budgetit_core::{BudgetPeriod, Category, UserType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// BudgetIt - Smart weekly budgeting with AI insights
#[derive(Parser)]
#[command(name = "budgetit")]
#[command(about = "Track expenses, budgets and savings goals with AI insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend API base URL (overrides BUDGETIT_API_URL and config.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// student or professional
        #[arg(long, default_value = "student")]
        user_type: UserType,
    },

    /// Sign in to an existing account
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage expenses (list, add)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage weekly/monthly budgets (list, set)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Manage savings goals (list, add)
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Show this week's totals, category breakdown and insights
    Dashboard {
        /// Don't pop up a random insight notification
        #[arg(long)]
        no_notify: bool,

        /// Seed for picking the notification (reproducible output)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List this week's insights
    Insights {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the budget assistant
    ///
    /// With a message, asks once and exits. Without one, starts an
    /// interactive conversation (/suggest lists sample questions, /quit exits).
    /// The backend is chosen with CHAT_BACKEND (gemini, ollama, mock).
    Chat {
        /// Question to ask
        message: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record an expense
    Add {
        #[arg(short, long)]
        amount: f64,

        /// food, transport, rent, entertainment, utilities, other
        #[arg(short, long)]
        category: Category,

        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets
    List,

    /// Set (or replace) the budget for a category
    Set {
        /// food, transport, rent, entertainment, utilities, other
        #[arg(short, long)]
        category: Category,

        #[arg(short, long)]
        amount: f64,

        /// weekly or monthly (only weekly budgets feed the insights)
        #[arg(short, long, default_value = "weekly")]
        period: BudgetPeriod,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress
    List,

    /// Add a savings goal
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(long)]
        target_amount: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        target_date: NaiveDate,
    },
}
